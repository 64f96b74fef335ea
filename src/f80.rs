//! 80-bit extended-precision operand (the x87 `long double`).
//!
//! Layout matches the x87 memory format: a 64-bit significand with an
//! explicit integer bit, then 15 exponent bits (bias 16383) and the sign.
//! Every `f64` converts exactly; the other direction rounds to nearest-even.

use core::fmt;
use core::ops::Neg;

const BIAS: i32 = 16383;
const EXP_MASK: u16 = 0x7fff;
const SIGN_MASK: u16 = 0x8000;
const INT_BIT: u64 = 1 << 63;
const QUIET_BIT: u64 = 1 << 62;

/// x87 extended-precision value.
#[derive(Clone, Copy)]
pub struct F80 {
    /// Sign (bit 15) and biased exponent (bits 0..15).
    se: u16,
    /// Significand with explicit integer bit.
    mant: u64,
}

impl F80 {
    /// +0.0
    pub const ZERO: F80 = F80 { se: 0, mant: 0 };
    /// -0.0
    pub const NEG_ZERO: F80 = F80 { se: SIGN_MASK, mant: 0 };
    /// 1.0
    pub const ONE: F80 = F80 { se: BIAS as u16, mant: INT_BIT };
    /// +∞
    pub const INFINITY: F80 = F80 { se: EXP_MASK, mant: INT_BIT };
    /// -∞
    pub const NEG_INFINITY: F80 = F80 { se: SIGN_MASK | EXP_MASK, mant: INT_BIT };
    /// Default quiet NaN.
    pub const NAN: F80 = F80 { se: EXP_MASK, mant: INT_BIT | QUIET_BIT };

    /// Smallest unbiased exponent of a normal value.
    pub const MIN_EXP: i32 = 1 - BIAS;
    /// Largest unbiased exponent of a finite value.
    pub const MAX_EXP: i32 = BIAS;

    /// Assemble from sign, biased exponent and raw significand.
    #[inline]
    pub const fn from_parts(negative: bool, biased_exp: u16, significand: u64) -> F80 {
        let sign = if negative { SIGN_MASK } else { 0 };
        F80 { se: sign | (biased_exp & EXP_MASK), mant: significand }
    }

    /// From the low 80 bits of `bits` (significand in bits 0..64).
    #[inline]
    pub const fn from_bits(bits: u128) -> F80 {
        F80 { se: (bits >> 64) as u16, mant: bits as u64 }
    }

    /// Raw 80-bit encoding in the low bits of a `u128`.
    #[inline]
    pub const fn to_bits(self) -> u128 {
        ((self.se as u128) << 64) | self.mant as u128
    }

    /// x87 memory image (little-endian, 10 bytes).
    pub const fn to_le_bytes(self) -> [u8; 10] {
        let m = self.mant.to_le_bytes();
        let e = self.se.to_le_bytes();
        [m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], e[0], e[1]]
    }

    /// Read an x87 memory image.
    pub const fn from_le_bytes(b: [u8; 10]) -> F80 {
        F80 {
            mant: u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            se: u16::from_le_bytes([b[8], b[9]]),
        }
    }

    /// `2^k` for `k` in `MIN_EXP..=MAX_EXP`.
    ///
    /// # Panics
    /// Panics when `k` has no normal encoding.
    pub const fn exp2i(k: i32) -> F80 {
        assert!(k >= F80::MIN_EXP && k <= F80::MAX_EXP, "exponent out of range");
        F80 { se: (k + BIAS) as u16, mant: INT_BIT }
    }

    /// Biased exponent field.
    #[inline]
    pub const fn biased_exponent(self) -> u16 {
        self.se & EXP_MASK
    }

    /// Raw significand including the integer bit.
    #[inline]
    pub const fn significand_bits(self) -> u64 {
        self.mant
    }

    /// Sign bit set.
    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        self.se & SIGN_MASK != 0
    }

    /// Not a number.
    #[inline]
    pub const fn is_nan(self) -> bool {
        self.biased_exponent() == EXP_MASK && (self.mant << 1) != 0
    }

    /// Positive or negative infinity.
    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.biased_exponent() == EXP_MASK && (self.mant << 1) == 0
    }

    /// Neither infinite nor NaN.
    #[inline]
    pub const fn is_finite(self) -> bool {
        self.biased_exponent() != EXP_MASK
    }

    /// Positive or negative zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.biased_exponent() == 0 && self.mant == 0
    }

    /// Absolute value.
    #[inline]
    pub const fn abs(self) -> F80 {
        F80 { se: self.se & EXP_MASK, mant: self.mant }
    }

    /// Exact conversion from `f64`. Subnormals come out normalized.
    pub const fn from_f64(x: f64) -> F80 {
        let bits = x.to_bits();
        let negative = bits >> 63 != 0;
        let e = ((bits >> 52) & 0x7ff) as i32;
        let frac = bits & ((1 << 52) - 1);

        if e == 0x7ff {
            if frac == 0 {
                return F80::from_parts(negative, EXP_MASK, INT_BIT);
            }
            return F80::from_parts(negative, EXP_MASK, INT_BIT | QUIET_BIT | (frac << 11));
        }
        if e == 0 {
            if frac == 0 {
                return F80::from_parts(negative, 0, 0);
            }
            let lz = frac.leading_zeros() as i32;
            let biased = BIAS + 63 - 1074 - lz;
            return F80::from_parts(negative, biased as u16, frac << lz);
        }
        F80::from_parts(negative, (e - 1023 + BIAS) as u16, INT_BIT | (frac << 11))
    }

    /// Exact conversion from `i32`.
    pub const fn from_i32(n: i32) -> F80 {
        if n == 0 {
            return F80::ZERO;
        }
        let a = n.unsigned_abs() as u64;
        let lz = a.leading_zeros() as i32;
        F80::from_parts(n < 0, (BIAS + 63 - lz) as u16, a << lz)
    }

    /// Round to the nearest `f64`, ties to even.
    pub const fn to_f64(self) -> f64 {
        let negative = self.is_sign_negative();
        let sign = if negative { 1u64 << 63 } else { 0 };

        if self.is_nan() {
            return f64::from_bits(sign | 0x7ff8_0000_0000_0000 | ((self.mant << 2) >> 12));
        }
        if self.is_infinite() {
            return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        if self.mant == 0 {
            return f64::from_bits(sign);
        }

        // value = m / 2^63 * 2^e2 with the top bit of m set
        let stored = self.biased_exponent() as i32;
        let e_eff = if stored == 0 { 1 } else { stored };
        let lz = self.mant.leading_zeros() as i32;
        let m = self.mant << lz;
        let mut e2 = e_eff - BIAS - lz;

        if e2 > 1023 {
            return f64::from_bits(sign | 0x7ff0_0000_0000_0000);
        }

        if e2 >= -1022 {
            let mut keep = m >> 11;
            let rem = m & 0x7ff;
            if rem > 0x400 || (rem == 0x400 && keep & 1 == 1) {
                keep += 1;
            }
            if keep == 1 << 53 {
                keep >>= 1;
                e2 += 1;
                if e2 > 1023 {
                    return f64::from_bits(sign | 0x7ff0_0000_0000_0000);
                }
            }
            let biased = (e2 + 1023) as u64;
            return f64::from_bits(sign | (biased << 52) | (keep & ((1 << 52) - 1)));
        }

        // Subnormal result: drop enough bits to land on multiples of 2^-1074.
        let drop = -e2 - 1011;
        if drop > 64 {
            return f64::from_bits(sign);
        }
        let wide = m as u128;
        let mut keep = wide >> drop;
        let rem = wide & ((1u128 << drop) - 1);
        let half = 1u128 << (drop - 1);
        if rem > half || (rem == half && keep & 1 == 1) {
            keep += 1;
        }
        f64::from_bits(sign | keep as u64)
    }
}

impl Default for F80 {
    fn default() -> Self {
        F80::ZERO
    }
}

impl PartialEq for F80 {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        if self.is_zero() && other.is_zero() {
            return true;
        }
        self.se == other.se && self.mant == other.mant
    }
}

impl Neg for F80 {
    type Output = F80;

    #[inline]
    fn neg(self) -> F80 {
        F80 { se: self.se ^ SIGN_MASK, mant: self.mant }
    }
}

impl From<f64> for F80 {
    #[inline]
    fn from(x: f64) -> Self {
        F80::from_f64(x)
    }
}

impl From<f32> for F80 {
    #[inline]
    fn from(x: f32) -> Self {
        F80::from_f64(x as f64)
    }
}

impl From<i32> for F80 {
    #[inline]
    fn from(n: i32) -> Self {
        F80::from_i32(n)
    }
}

impl From<F80> for f64 {
    #[inline]
    fn from(x: F80) -> Self {
        x.to_f64()
    }
}

impl fmt::Debug for F80 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F80({:#06x}:{:#018x} ≈ {:e})", self.se, self.mant, self.to_f64())
    }
}

impl fmt::Display for F80 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(F80::ONE.to_f64(), 1.0);
        assert_eq!(F80::INFINITY.to_f64(), f64::INFINITY);
        assert_eq!(F80::NEG_INFINITY.to_f64(), f64::NEG_INFINITY);
        assert!(F80::NAN.is_nan());
        assert!(F80::NAN.to_f64().is_nan());
        assert_eq!(F80::ZERO, F80::NEG_ZERO);
        assert!(F80::NEG_ZERO.is_sign_negative());
        assert_ne!(F80::NAN, F80::NAN);
    }

    #[test]
    fn test_known_encodings() {
        // 1.0 in x87 memory: 00..80 ff 3f
        assert_eq!(
            F80::ONE.to_le_bytes(),
            [0, 0, 0, 0, 0, 0, 0, 0x80, 0xff, 0x3f]
        );
        assert_eq!(F80::from_f64(-2.0).to_bits(), 0xc000_8000_0000_0000_0000);
        assert_eq!(F80::from_le_bytes(F80::ONE.to_le_bytes()), F80::ONE);
    }

    #[test]
    fn test_f64_exact_both_ways() {
        let samples = [
            0.0,
            -0.0,
            1.0,
            -1.5,
            core::f64::consts::PI,
            f64::MAX,
            f64::MIN_POSITIVE,
            f64::MIN_POSITIVE / 8.0,
            f64::from_bits(1),
            -f64::from_bits(0x000f_ffff_ffff_ffff),
            1e-300,
            12345.678,
        ];
        for x in samples {
            let back = F80::from_f64(x).to_f64();
            assert_eq!(back.to_bits(), x.to_bits(), "{x:e} did not survive");
        }
    }

    #[test]
    fn test_subnormal_f64_is_normalized() {
        let tiny = F80::from_f64(f64::from_bits(1));
        assert_eq!(tiny, F80::exp2i(-1074));
        assert_eq!(tiny.significand_bits(), INT_BIT);
    }

    #[test]
    fn test_to_f64_rounds_to_nearest_even() {
        // 1 + 2^-53 is a tie between 1 and 1 + 2^-52: rounds to even (1.0)
        let tie = F80::from_parts(false, BIAS as u16, INT_BIT | (1 << 10));
        assert_eq!(tie.to_f64(), 1.0);
        // 1 + 2^-52 + 2^-53 ties upward to 1 + 2^-51
        let tie_up = F80::from_parts(false, BIAS as u16, INT_BIT | (1 << 11) | (1 << 10));
        assert_eq!(tie_up.to_f64(), 1.0 + 2f64.powi(-51));
        // just above the tie rounds up
        let above = F80::from_parts(false, BIAS as u16, INT_BIT | (1 << 10) | 1);
        assert_eq!(above.to_f64(), 1.0 + f64::EPSILON);
    }

    #[test]
    fn test_to_f64_range_limits() {
        assert_eq!(F80::exp2i(1024).to_f64(), f64::INFINITY);
        assert_eq!((-F80::exp2i(2000)).to_f64(), f64::NEG_INFINITY);
        assert_eq!(F80::exp2i(-1074).to_f64(), f64::from_bits(1));
        // 2^-1075 is a tie with zero: even wins
        assert_eq!(F80::exp2i(-1075).to_f64(), 0.0);
        assert_eq!(F80::exp2i(-3000).to_f64(), 0.0);
        // largest finite f64 rounds up into infinity once past the halfway point
        let past_max = F80::from_parts(false, (1023 + BIAS) as u16, u64::MAX);
        assert_eq!(past_max.to_f64(), f64::INFINITY);
    }

    #[test]
    fn test_from_i32() {
        for n in [-7, -1, 0, 1, 2, 3, 1023, -16382, i32::MAX, i32::MIN] {
            assert_eq!(F80::from_i32(n).to_f64(), n as f64, "n = {n}");
        }
    }

    #[test]
    fn test_neg_and_abs() {
        let x = F80::from_f64(3.25);
        assert_eq!((-x).to_f64(), -3.25);
        assert_eq!((-x).abs(), x);
    }
}
