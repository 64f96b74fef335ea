//! Portable extended-precision leaves.
//!
//! `logbl` and `significandl` are pure exponent/significand manipulation
//! and match the x87 `fxtract` results bit for bit. `atanl` evaluates at
//! double precision and widens, so it is accurate to about 2^-53 rather
//! than the full 64-bit significand.

use crate::f80::F80;

const BIAS: i32 = 16383;
const QUIET_BIT: u64 = 1 << 62;

/// Unbiased exponent of a finite nonzero value, denormals normalized.
#[inline]
fn exponent_of(x: F80) -> i32 {
    let biased = x.biased_exponent() as i32;
    let lz = x.significand_bits().leading_zeros() as i32;
    if biased == 0 {
        1 - BIAS - lz
    } else {
        biased - BIAS - lz
    }
}

#[inline]
fn quiet(x: F80) -> F80 {
    F80::from_parts(
        x.is_sign_negative(),
        x.biased_exponent(),
        x.significand_bits() | QUIET_BIT,
    )
}

/// `logbl`: the unbiased exponent as a value. `logbl(±0) = -∞`,
/// `logbl(±∞) = +∞`.
pub fn logbl(x: F80) -> F80 {
    if x.is_nan() {
        return quiet(x);
    }
    if x.is_infinite() {
        return F80::INFINITY;
    }
    if x.is_zero() {
        return F80::NEG_INFINITY;
    }
    F80::from_i32(exponent_of(x))
}

/// `significandl`: `x` scaled into `[1, 2)`, keeping its sign. Zeros and
/// infinities are returned unchanged.
pub fn significandl(x: F80) -> F80 {
    if x.is_nan() {
        return quiet(x);
    }
    if x.is_infinite() || x.is_zero() {
        return x;
    }
    let m = x.significand_bits();
    F80::from_parts(x.is_sign_negative(), BIAS as u16, m << m.leading_zeros())
}

/// `atanl`
pub fn atanl(x: F80) -> F80 {
    if x.is_nan() {
        return quiet(x);
    }
    // atan(x) = x to full precision once x^2 < 2^-64
    if x.is_zero() || exponent_of(x) < -33 {
        return x;
    }
    F80::from_f64(libm::atan(x.to_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(x: F80) -> u128 {
        x.to_bits()
    }

    #[test]
    fn test_logbl() {
        assert_eq!(logbl(F80::from_f64(8.0)), F80::from_i32(3));
        assert_eq!(logbl(F80::from_f64(-0.75)), F80::from_i32(-1));
        assert_eq!(logbl(F80::ONE), F80::ZERO);
        assert_eq!(logbl(F80::ZERO), F80::NEG_INFINITY);
        assert_eq!(logbl(F80::NEG_ZERO), F80::NEG_INFINITY);
        assert_eq!(logbl(F80::NEG_INFINITY), F80::INFINITY);
        assert!(logbl(F80::NAN).is_nan());
        // smallest extended denormal: 2^-16445
        assert_eq!(logbl(F80::from_parts(false, 0, 1)), F80::from_i32(-16445));
    }

    #[test]
    fn test_significandl() {
        assert_eq!(significandl(F80::from_f64(12.0)), F80::from_f64(1.5));
        assert_eq!(significandl(F80::from_f64(-0.1)).to_f64(), -1.6);
        assert_eq!(bits(significandl(F80::NEG_ZERO)), bits(F80::NEG_ZERO));
        assert_eq!(significandl(F80::INFINITY), F80::INFINITY);
        assert_eq!(significandl(F80::from_parts(true, 0, 1)), -F80::ONE);
    }

    #[test]
    fn test_decomposition_reassembles() {
        // x == significand(x) * 2^logb(x)
        for v in [3.0, -1e-300, 1e300, 0.1, f64::from_bits(1), 7.5e-10] {
            let x = F80::from_f64(v);
            let e = logbl(x).to_f64() as i32;
            let s = significandl(x).to_f64();
            assert_eq!(libm::scalbn(s, e), v, "{v:e}");
        }
    }

    #[test]
    fn test_atanl() {
        assert_eq!(atanl(F80::ONE).to_f64(), core::f64::consts::FRAC_PI_4);
        assert_eq!(atanl(F80::INFINITY).to_f64(), core::f64::consts::FRAC_PI_2);
        assert_eq!(atanl(F80::NEG_INFINITY).to_f64(), -core::f64::consts::FRAC_PI_2);
        assert_eq!(bits(atanl(F80::NEG_ZERO)), bits(F80::NEG_ZERO));
        let tiny = F80::exp2i(-16000);
        assert_eq!(bits(atanl(tiny)), bits(tiny));
        assert!(atanl(F80::NAN).is_nan());
    }

    mod props {
        use super::*;
        use proptest::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_decomposition_reassembles(v in POSITIVE | NEGATIVE | NORMAL | SUBNORMAL) {
                let x = F80::from_f64(v);
                let e = logbl(x).to_f64();
                let s = significandl(x).to_f64();
                prop_assert!(s.abs() >= 1.0 && s.abs() < 2.0, "significand {s}");
                prop_assert_eq!(e, e.trunc());
                prop_assert_eq!(libm::scalbn(s, e as i32), v);
            }

            #[test]
            fn prop_logb_of_power_of_two(k in F80::MIN_EXP..=F80::MAX_EXP) {
                prop_assert_eq!(logbl(F80::exp2i(k)), F80::from_i32(k));
                prop_assert_eq!(significandl(F80::exp2i(k)), F80::ONE);
            }

            #[test]
            fn prop_atanl_is_odd_and_bounded(v in -1e300f64..1e300) {
                let a = atanl(F80::from_f64(v)).to_f64();
                let b = atanl(F80::from_f64(-v)).to_f64();
                prop_assert_eq!(a, -b);
                prop_assert!(a.abs() <= core::f64::consts::FRAC_PI_2);
            }
        }
    }
}

