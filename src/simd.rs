//! Four-lane and slice entry points for the tiered double family.
//!
//! `*_x4` functions work on `wide::f64x4` and use the same reductions and
//! polynomials as the dedicated scalar kernels, with lane-wise fixups for
//! special inputs. Slice functions process four values at a time and are
//! cloned per ISA tier with `multiversion`, picking the best clone for the
//! running CPU on first call.
//!
//! Unlike the scalar kernels, batch functions never record a
//! [`MathError`](crate::MathError).

use wide::{CmpEq, CmpGe, CmpGt, CmpLe, CmpLt, f64x4};

use crate::targets::isa_multiversion;

const LN2_HI: f64 = 6.931_471_803_691_238_164_90e-1;
const LN2_LO: f64 = 1.908_214_929_270_587_700_02e-10;

const ZERO: f64x4 = f64x4::new([0.0; 4]);
const ONE: f64x4 = f64x4::new([1.0; 4]);
const TWO: f64x4 = f64x4::new([2.0; 4]);
const INF: f64x4 = f64x4::new([f64::INFINITY; 4]);
const NEG_INF: f64x4 = f64x4::new([f64::NEG_INFINITY; 4]);
const NAN: f64x4 = f64x4::new([f64::NAN; 4]);
const INV_LN2: f64x4 = f64x4::new([core::f64::consts::LOG2_E; 4]);
const V_LN2_HI: f64x4 = f64x4::new([LN2_HI; 4]);
const V_LN2_LO: f64x4 = f64x4::new([LN2_LO; 4]);
const NEG_LN2_HI: f64x4 = f64x4::new([-LN2_HI; 4]);
const NEG_LN2_LO: f64x4 = f64x4::new([-LN2_LO; 4]);

// ln(f64::MAX), ln(2^-1075)
const EXP_MAX: f64x4 = f64x4::new([709.782_712_893_383_973_096; 4]);
const EXP_MIN: f64x4 = f64x4::new([-745.133_219_101_941_108_420; 4]);
const EXP2_MAX: f64x4 = f64x4::new([1024.0; 4]);
const EXP2_MIN: f64x4 = f64x4::new([-1075.0; 4]);

// 1/n! for n = 2..=13
const EXP_POLY: [f64; 12] = [
    1.0 / 2.0,
    1.0 / 6.0,
    1.0 / 24.0,
    1.0 / 120.0,
    1.0 / 720.0,
    1.0 / 5_040.0,
    1.0 / 40_320.0,
    1.0 / 362_880.0,
    1.0 / 3_628_800.0,
    1.0 / 39_916_800.0,
    1.0 / 479_001_600.0,
    1.0 / 6_227_020_800.0,
];

// 1/(2k+1) for k = 1..=9
const LOG_POLY: [f64; 9] = [
    1.0 / 3.0,
    1.0 / 5.0,
    1.0 / 7.0,
    1.0 / 9.0,
    1.0 / 11.0,
    1.0 / 13.0,
    1.0 / 15.0,
    1.0 / 17.0,
    1.0 / 19.0,
];

#[inline(always)]
fn horner_x4(x: f64x4, coeffs: &[f64]) -> f64x4 {
    let mut acc = ZERO;
    for &c in coeffs.iter().rev() {
        acc = acc.mul_add(x, f64x4::splat(c));
    }
    acc
}

/// `e^r` for reduced `r`.
#[inline(always)]
fn exp_poly_x4(r: f64x4) -> f64x4 {
    let q = horner_x4(r, &EXP_POLY);
    ONE + (r * r).mul_add(q, r)
}

/// `p * 2^k` lane by lane; `k` holds integral values.
#[inline(always)]
fn scale_x4(p: f64x4, k: f64x4) -> f64x4 {
    let p = p.to_array();
    let k = k.to_array();
    f64x4::new([
        libm::scalbn(p[0], k[0] as i32),
        libm::scalbn(p[1], k[1] as i32),
        libm::scalbn(p[2], k[2] as i32),
        libm::scalbn(p[3], k[3] as i32),
    ])
}

/// `e^x` on four lanes.
#[inline]
pub fn exp_x4(x: f64x4) -> f64x4 {
    let xc = x.max(EXP_MIN).min(EXP_MAX);
    let kf = (xc * INV_LN2).round();
    let r = kf.mul_add(NEG_LN2_HI, xc);
    let r = kf.mul_add(NEG_LN2_LO, r);
    let y = scale_x4(exp_poly_x4(r), kf);

    let y = x.cmp_gt(EXP_MAX).blend(INF, y);
    let y = x.cmp_lt(EXP_MIN).blend(ZERO, y);
    x.is_nan().blend(x, y)
}

/// `2^x` on four lanes. Exact for integral `x`.
#[inline]
pub fn exp2_x4(x: f64x4) -> f64x4 {
    let xc = x.max(EXP2_MIN).min(EXP2_MAX);
    let kf = xc.round();
    let t = xc - kf;
    let r = t.mul_add(V_LN2_HI, t * V_LN2_LO);
    let y = scale_x4(exp_poly_x4(r), kf);

    let y = x.cmp_ge(EXP2_MAX).blend(INF, y);
    let y = x.cmp_le(EXP2_MIN).blend(ZERO, y);
    x.is_nan().blend(x, y)
}

/// Splits `|x|` into `(e, m)` with `m` in `(sqrt(2)/2, sqrt(2)]`.
#[inline(always)]
fn split_x4(x: f64x4) -> (f64x4, f64x4) {
    const FRAC: u64 = (1 << 52) - 1;
    const TWO54: f64 = 18_014_398_509_481_984.0;

    let bits: [u64; 4] = bytemuck::cast(x);
    let mut e = [0.0; 4];
    let mut m = [0.0; 4];
    for i in 0..4 {
        let mut b = bits[i] & !(1 << 63);
        let mut ei: i32 = 0;
        if b < (1 << 52) {
            b = (f64::from_bits(b) * TWO54).to_bits();
            ei = -54;
        }
        ei += (b >> 52) as i32 - 1023;
        let mut mi = f64::from_bits((b & FRAC) | (1023 << 52));
        if mi > core::f64::consts::SQRT_2 {
            mi *= 0.5;
            ei += 1;
        }
        e[i] = ei as f64;
        m[i] = mi;
    }
    (f64x4::new(e), f64x4::new(m))
}

/// `ln(m)` for `m` near 1.
#[inline(always)]
fn ln_m_x4(m: f64x4) -> f64x4 {
    let f = m - ONE;
    let s = f / (TWO + f);
    let z = s * s;
    let two_s = s + s;
    (two_s * z).mul_add(horner_x4(z, &LOG_POLY), two_s)
}

#[inline(always)]
fn log_fixup_x4(x: f64x4, y: f64x4) -> f64x4 {
    let y = x.cmp_eq(INF).blend(INF, y);
    let y = x.cmp_eq(ZERO).blend(NEG_INF, y);
    let y = x.cmp_lt(ZERO).blend(NAN, y);
    x.is_nan().blend(x, y)
}

/// Natural logarithm on four lanes.
#[inline]
pub fn log_x4(x: f64x4) -> f64x4 {
    let (e, m) = split_x4(x);
    let ln_m = ln_m_x4(m);
    let y = e.mul_add(V_LN2_HI, e.mul_add(V_LN2_LO, ln_m));
    log_fixup_x4(x, y)
}

/// Base-2 logarithm on four lanes. Exact for powers of two.
#[inline]
pub fn log2_x4(x: f64x4) -> f64x4 {
    let (e, m) = split_x4(x);
    let y = ln_m_x4(m).mul_add(INV_LN2, e);
    log_fixup_x4(x, y)
}

/// Round toward zero on four lanes.
#[inline]
pub fn trunc_x4(x: f64x4) -> f64x4 {
    x.cmp_lt(ZERO).blend(x.ceil(), x.floor())
}

/// Applies a four-lane function to a slice, padding the tail.
#[inline(always)]
fn map_x4(values: &mut [f64], f: impl Fn(f64x4) -> f64x4) {
    let (chunks, rest) = values.as_chunks_mut::<4>();
    for chunk in chunks {
        *chunk = f(f64x4::new(*chunk)).to_array();
    }
    if !rest.is_empty() {
        let mut tail = [1.0; 4];
        tail[..rest.len()].copy_from_slice(rest);
        let out = f(f64x4::new(tail)).to_array();
        rest.copy_from_slice(&out[..rest.len()]);
    }
}

isa_multiversion! {
    /// `e^x` in place.
    pub fn exp_slice(values: &mut [f64]) {
        map_x4(values, exp_x4);
    }
}

isa_multiversion! {
    /// `2^x` in place.
    pub fn exp2_slice(values: &mut [f64]) {
        map_x4(values, exp2_x4);
    }
}

isa_multiversion! {
    /// Natural logarithm in place.
    pub fn log_slice(values: &mut [f64]) {
        map_x4(values, log_x4);
    }
}

isa_multiversion! {
    /// Base-2 logarithm in place.
    pub fn log2_slice(values: &mut [f64]) {
        map_x4(values, log2_x4);
    }
}

isa_multiversion! {
    /// Round toward -∞ in place.
    pub fn floor_slice(values: &mut [f64]) {
        map_x4(values, f64x4::floor);
    }
}

isa_multiversion! {
    /// Round toward zero in place.
    pub fn trunc_slice(values: &mut [f64]) {
        map_x4(values, trunc_x4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::x86_64 as scalar;
    #[cfg(not(feature = "std"))]
    use alloc::{vec, vec::Vec};

    fn rel(a: f64, b: f64) -> f64 {
        if a == b { 0.0 } else { ((a - b) / b).abs() }
    }

    #[test]
    fn test_exp_x4_matches_scalar() {
        for base in [-700.0, -20.5, -1.0, 0.0, 0.693, 3.3, 100.25, 709.0] {
            let x = f64x4::new([base, base + 0.1, base - 0.37, base * 0.5]);
            let got = exp_x4(x).to_array();
            for (i, v) in x.to_array().into_iter().enumerate() {
                assert!(rel(got[i], libm::exp(v)) < 1e-15, "exp({v}) = {}", got[i]);
            }
        }
    }

    #[test]
    fn test_exp_x4_specials() {
        let x = f64x4::new([f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 800.0]);
        let y = exp_x4(x).to_array();
        assert!(y[0].is_nan());
        assert_eq!(y[1], f64::INFINITY);
        assert_eq!(y[2], 0.0);
        assert_eq!(y[3], f64::INFINITY);
        assert_eq!(exp_x4(f64x4::new([-800.0; 4])).to_array(), [0.0; 4]);
    }

    #[test]
    fn test_exp2_x4_exact_on_integers() {
        let x = f64x4::new([-1074.0, -3.0, 0.0, 1023.0]);
        let y = exp2_x4(x).to_array();
        assert_eq!(y, [f64::from_bits(1), 0.125, 1.0, libm::scalbn(1.0, 1023)]);
        let y = exp2_x4(f64x4::new([1024.0, -1075.0, f64::NAN, 0.5])).to_array();
        assert_eq!(y[0], f64::INFINITY);
        assert_eq!(y[1], 0.0);
        assert!(y[2].is_nan());
        assert!(rel(y[3], core::f64::consts::SQRT_2) < 1e-15);
    }

    #[test]
    fn test_log_x4() {
        let x = f64x4::new([1e-310, 0.5, 10.0, 1e300]);
        let got = log_x4(x).to_array();
        for (i, v) in x.to_array().into_iter().enumerate() {
            assert!(rel(got[i], scalar::log_fma(v)) < 1e-15, "log({v})");
        }
        let y = log_x4(f64x4::new([0.0, -1.0, f64::INFINITY, 1.0])).to_array();
        assert_eq!(y[0], f64::NEG_INFINITY);
        assert!(y[1].is_nan());
        assert_eq!(y[2], f64::INFINITY);
        assert_eq!(y[3], 0.0);
    }

    #[test]
    fn test_log2_x4_powers_of_two() {
        let x = f64x4::new([f64::from_bits(1), 0.25, 1.0, 2f64.powi(1000)]);
        assert_eq!(log2_x4(x).to_array(), [-1074.0, -2.0, 0.0, 1000.0]);
    }

    #[test]
    fn test_slices_cover_tail() {
        let input: Vec<f64> = (0..11).map(|i| i as f64 * 0.75 - 3.0).collect();

        let mut v = input.clone();
        exp_slice(&mut v);
        for (x, y) in input.iter().zip(&v) {
            assert!(rel(*y, libm::exp(*x)) < 1e-15, "exp({x})");
        }

        let mut v = input.clone();
        floor_slice(&mut v);
        for (x, y) in input.iter().zip(&v) {
            assert_eq!(*y, libm::floor(*x), "floor({x})");
        }

        let mut v = input.clone();
        trunc_slice(&mut v);
        for (x, y) in input.iter().zip(&v) {
            assert_eq!(*y, libm::trunc(*x), "trunc({x})");
        }

        let mut v: Vec<f64> = input.iter().map(|x| x.abs() + 0.5).collect();
        let orig = v.clone();
        log2_slice(&mut v);
        for (x, y) in orig.iter().zip(&v) {
            assert!((y - libm::log2(*x)).abs() < 1e-15, "log2({x})");
        }

        let mut v = orig.clone();
        log_slice(&mut v);
        for (x, y) in orig.iter().zip(&v) {
            assert!((y - libm::log(*x)).abs() < 1e-15, "log({x})");
        }

        let mut v = vec![3.0, -1.0, 0.5];
        exp2_slice(&mut v);
        assert_eq!(v[..2], [8.0, 0.5]);
    }

    #[test]
    fn test_empty_slice() {
        let mut v: [f64; 0] = [];
        exp_slice(&mut v);
        floor_slice(&mut v);
    }
}
