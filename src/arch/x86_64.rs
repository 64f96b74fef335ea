//! Dedicated x86-64 double-precision kernels.
//!
//! Two families, matching the two ISA thresholds the selector knows about:
//!
//! * `exp`, `exp2`, `log`, `log2`, `pow` written around fused multiply-add
//!   (the x86-64-v3 tier). Each public kernel is cloned per ISA level with
//!   `multiversion`, so the `fma` instruction runs whenever the CPU has it,
//!   whatever the build was compiled for. They classify their own errors
//!   through the `math_*` helpers rather than relying on a wrapper.
//! * `ceil`, `floor`, `rint`, `trunc`, `modf` built on SSE4.1 `roundsd`
//!   (the x86-64-v2 tier). The instruction is used when the compile target
//!   has SSE4.1 or, with `std`, when the running CPU reports it. Otherwise
//!   they use the 2^52 add-subtract rounding, which gives identical results.
//!
//! All of them run on any host; the selector decides whether a build
//! binds them.

use crate::error::{math_divzero, math_invalid, math_oflow, math_uflow};
use crate::float::{is_integer, is_odd_integer};
use crate::mlaf::{Fused, MulAddMode};
use crate::targets::isa_multiversion;

// ============================================================================
// Shared constants
// ============================================================================

const LN2_HI: f64 = 6.931_471_803_691_238_164_90e-1;
const LN2_LO: f64 = 1.908_214_929_270_587_700_02e-10;
const INV_LN2: f64 = core::f64::consts::LOG2_E;

// 1.5 * 2^52: adding then subtracting rounds to the nearest integer
const SHIFT: f64 = 6_755_399_441_055_744.0;
const TWO54: f64 = 18_014_398_509_481_984.0;

// ln(f64::MAX) and ln(2^-1075)
const EXP_OVERFLOW: f64 = 709.782_712_893_383_973_096;
const EXP_UNDERFLOW: f64 = -745.133_219_101_941_108_420;

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

// 1/(2k+1) for k = 1..=9; ln(m) = 2s * (1 + s^2/3 + s^4/5 + ...)
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

const FRAC_MASK: u64 = (1 << 52) - 1;

// ============================================================================
// exp family (FMA tier)
// ============================================================================

/// `e^r` for `|r| <= ln2/2` (plus a little slack).
#[inline(always)]
fn exp_poly<M: MulAddMode>(r: f64) -> f64 {
    let q = M::horner(r, &EXP_POLY);
    1.0 + M::mla(r, r * r, q)
}

/// Splits `x + tail` as `k*ln2 + r` and returns `(e^r, k)`.
#[inline(always)]
fn exp_reduce<M: MulAddMode>(x: f64, tail: f64) -> (f64, i32) {
    let kf = M::mla(SHIFT, x, INV_LN2) - SHIFT;
    let r = M::neg_mla(M::neg_mla(x, kf, LN2_HI), kf, LN2_LO) + tail;
    (exp_poly::<M>(r), kf as i32)
}

/// Scales by `2^k` and classifies a result that left the finite range.
#[inline(always)]
fn exp_finish(p: f64, k: i32, negative: bool) -> f64 {
    let r = libm::scalbn(p, k);
    if r.is_infinite() {
        return math_oflow(negative);
    }
    if r == 0.0 {
        return math_uflow(negative);
    }
    if negative { -r } else { r }
}

#[inline(always)]
pub(crate) fn exp_with<M: MulAddMode>(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    if x == f64::INFINITY {
        return x;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    if x > EXP_OVERFLOW {
        return math_oflow(false);
    }
    if x < EXP_UNDERFLOW {
        return math_uflow(false);
    }
    let (p, k) = exp_reduce::<M>(x, 0.0);
    exp_finish(p, k, false)
}

#[inline(always)]
pub(crate) fn exp2_with<M: MulAddMode>(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    if x == f64::INFINITY {
        return x;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    if x >= 1024.0 {
        return math_oflow(false);
    }
    if x <= -1075.0 {
        return math_uflow(false);
    }
    let kf = (x + SHIFT) - SHIFT;
    // exact: |t| <= 0.5 and kf is the integer nearest x
    let t = x - kf;
    let r = M::mla(t * LN2_LO, t, LN2_HI);
    exp_finish(exp_poly::<M>(r), kf as i32, false)
}

// ============================================================================
// log family (FMA tier)
// ============================================================================

/// Decomposes a positive finite `x` as `2^e * m` with `m` in
/// `(sqrt(2)/2, sqrt(2)]` and returns `(e, ln(m))`.
#[inline(always)]
fn log_parts<M: MulAddMode>(x: f64) -> (f64, f64) {
    let mut bits = x.to_bits();
    let mut e: i32 = 0;
    if bits < (1 << 52) {
        bits = (x * TWO54).to_bits();
        e = -54;
    }
    e += ((bits >> 52) as i32) - 1023;
    let mut m = f64::from_bits((bits & FRAC_MASK) | (1023 << 52));
    if m > core::f64::consts::SQRT_2 {
        m *= 0.5;
        e += 1;
    }
    let f = m - 1.0;
    let s = f / (2.0 + f);
    let z = s * s;
    let two_s = 2.0 * s;
    let ln_m = M::mla(two_s, two_s * z, M::horner(z, &LOG_POLY));
    (e as f64, ln_m)
}

/// Special inputs shared by `log` and `log2`. `None` for positive finite.
#[inline(always)]
fn log_special(x: f64) -> Option<f64> {
    if x.is_nan() {
        return Some(x);
    }
    if x == 0.0 {
        return Some(math_divzero(true));
    }
    if x < 0.0 {
        return Some(math_invalid(x));
    }
    if x == f64::INFINITY {
        return Some(x);
    }
    None
}

#[inline(always)]
pub(crate) fn log_with<M: MulAddMode>(x: f64) -> f64 {
    if let Some(r) = log_special(x) {
        return r;
    }
    let (e, ln_m) = log_parts::<M>(x);
    M::mla(M::mla(ln_m, e, LN2_LO), e, LN2_HI)
}

#[inline(always)]
pub(crate) fn log2_with<M: MulAddMode>(x: f64) -> f64 {
    if let Some(r) = log_special(x) {
        return r;
    }
    let (e, ln_m) = log_parts::<M>(x);
    M::mla(e, ln_m, INV_LN2)
}

// ============================================================================
// pow (FMA tier)
// ============================================================================

#[inline(always)]
pub(crate) fn pow_with<M: MulAddMode>(x: f64, y: f64) -> f64 {
    if y == 0.0 || x == 1.0 {
        return 1.0;
    }
    if x.is_nan() || y.is_nan() {
        return x + y;
    }
    let y_odd = is_odd_integer(y);

    if y.is_infinite() {
        let ax = x.abs();
        if ax == 1.0 {
            return 1.0;
        }
        return if (ax < 1.0) == (y > 0.0) { 0.0 } else { f64::INFINITY };
    }
    if x == 0.0 {
        let negative = x.is_sign_negative() && y_odd;
        if y < 0.0 {
            return math_divzero(negative);
        }
        return if negative { -0.0 } else { 0.0 };
    }
    if x.is_infinite() {
        let negative = x < 0.0 && y_odd;
        let mag = if y > 0.0 { f64::INFINITY } else { 0.0 };
        return if negative { -mag } else { mag };
    }

    let mut negative = false;
    if x < 0.0 {
        if !is_integer(y) {
            return math_invalid(x);
        }
        negative = y_odd;
    }

    // ln|x| as hi + lo, then y*ln|x| as t_hi + t_lo
    let (e, ln_m) = log_parts::<M>(x.abs());
    let a = e * LN2_HI;
    let hi = a + ln_m;
    let lo = (a - hi) + ln_m + e * LN2_LO;
    let t_hi = y * hi;
    if t_hi > EXP_OVERFLOW {
        return math_oflow(negative);
    }
    if t_hi < EXP_UNDERFLOW {
        return math_uflow(negative);
    }
    let t_lo = M::mla(-t_hi, y, hi) + y * lo;

    let (p, k) = exp_reduce::<M>(t_hi, t_lo);
    exp_finish(p, k, negative)
}

isa_multiversion! {
    /// `__exp_fma`
    pub fn exp_fma(x: f64) -> f64 {
        exp_with::<Fused>(x)
    }
}

isa_multiversion! {
    /// `__exp2_fma`
    pub fn exp2_fma(x: f64) -> f64 {
        exp2_with::<Fused>(x)
    }
}

isa_multiversion! {
    /// `__log_fma`
    pub fn log_fma(x: f64) -> f64 {
        log_with::<Fused>(x)
    }
}

isa_multiversion! {
    /// `__log2_fma`. Exact for powers of two.
    pub fn log2_fma(x: f64) -> f64 {
        log2_with::<Fused>(x)
    }
}

isa_multiversion! {
    /// `__pow_fma`
    pub fn pow_fma(x: f64, y: f64) -> f64 {
        pow_with::<Fused>(x, y)
    }
}

// ============================================================================
// Rounding family (SSE4.1 tier)
// ============================================================================

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod roundsd {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::*;

    pub(super) const FLOOR: i32 = _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC;
    pub(super) const CEIL: i32 = _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC;
    pub(super) const TRUNC: i32 = _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC;
    pub(super) const RINT: i32 = _MM_FROUND_CUR_DIRECTION;

    #[target_feature(enable = "sse4.1")]
    #[allow(unsafe_code, unused_unsafe)]
    fn round_sse41<const MODE: i32>(x: f64) -> f64 {
        // SAFETY: value-only intrinsics inside an sse4.1 function.
        unsafe {
            let v = _mm_set_sd(x);
            _mm_cvtsd_f64(_mm_round_sd::<MODE>(v, v))
        }
    }

    /// Whether `roundsd` can execute: fixed at compile time when the target
    /// has SSE4.1, detected once per process otherwise.
    #[inline(always)]
    pub(super) fn available() -> bool {
        #[cfg(target_feature = "sse4.1")]
        {
            true
        }
        #[cfg(all(not(target_feature = "sse4.1"), feature = "std"))]
        {
            std::arch::is_x86_feature_detected!("sse4.1")
        }
        #[cfg(all(not(target_feature = "sse4.1"), not(feature = "std")))]
        {
            false
        }
    }

    /// `roundsd` in `MODE`, or `None` when the CPU lacks SSE4.1.
    #[inline(always)]
    #[allow(unsafe_code)]
    pub(super) fn round<const MODE: i32>(x: f64) -> Option<f64> {
        if !available() {
            return None;
        }
        // SAFETY: sse4.1 support was confirmed just above.
        Some(unsafe { round_sse41::<MODE>(x) })
    }
}

/// Nearest integer, ties to even, in the default rounding mode.
#[inline(always)]
fn rint_soft(x: f64) -> f64 {
    const TWO52: f64 = 4_503_599_627_370_496.0;
    let ax = x.abs();
    if !(ax < TWO52) {
        return x;
    }
    ((ax + TWO52) - TWO52).copysign(x)
}

#[inline(always)]
fn floor_soft(x: f64) -> f64 {
    let r = rint_soft(x);
    let r = if r > x { r - 1.0 } else { r };
    r.copysign(x)
}

#[inline(always)]
fn ceil_soft(x: f64) -> f64 {
    let r = rint_soft(x);
    let r = if r < x { r + 1.0 } else { r };
    r.copysign(x)
}

#[inline(always)]
fn trunc_soft(x: f64) -> f64 {
    if x < 0.0 { ceil_soft(x) } else { floor_soft(x) }
}

/// `__rint_sse41`
pub fn rint_sse41(x: f64) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if let Some(r) = roundsd::round::<{ roundsd::RINT }>(x) {
            return r;
        }
    }
    rint_soft(x)
}

/// `__floor_sse41`
pub fn floor_sse41(x: f64) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if let Some(r) = roundsd::round::<{ roundsd::FLOOR }>(x) {
            return r;
        }
    }
    floor_soft(x)
}

/// `__ceil_sse41`
pub fn ceil_sse41(x: f64) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if let Some(r) = roundsd::round::<{ roundsd::CEIL }>(x) {
            return r;
        }
    }
    ceil_soft(x)
}

/// `__trunc_sse41`
pub fn trunc_sse41(x: f64) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if let Some(r) = roundsd::round::<{ roundsd::TRUNC }>(x) {
            return r;
        }
    }
    trunc_soft(x)
}

/// `__modf_sse41`: `(fractional, integral)`, both carrying the sign of `x`.
pub fn modf_sse41(x: f64) -> (f64, f64) {
    let i = trunc_sse41(x);
    let frac = if x.is_infinite() { 0.0 } else { x - i };
    (frac.copysign(x), i)
}
