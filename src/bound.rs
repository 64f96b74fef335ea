//! Operations as bound for this build.
//!
//! Every function here calls the implementation [`resolve`] picks for
//! [`BuildConfig::TARGET`]. The choice is made during constant evaluation,
//! so each call is a direct call with no dispatch at run time.
//!
//! # Quick Start
//!
//! ```rust
//! use tiered_libm::bound::{exp, floor, logbl};
//! use tiered_libm::F80;
//!
//! assert_eq!(exp(0.0), 1.0);
//! assert_eq!(floor(-1.5), -2.0);
//! assert_eq!(logbl(F80::from_f64(1024.0)), F80::from_i32(10));
//! ```
//!
//! # Which implementation?
//!
//! ```rust
//! use tiered_libm::{bound, Op};
//!
//! let b = bound::binding(Op::Floor);
//! println!("{b}"); // e.g. "floor -> __floor_sse41 [dedicated, x86_64, x86-64-v2+]"
//! ```
//!
//! Building with `-C target-cpu=x86-64-v3` moves the transcendental family
//! onto the FMA kernels; the `shared` feature switches m68k builds to the
//! compatibility wrappers.

use crate::config::BuildConfig;
use crate::f80::F80;
use crate::op::Op;
use crate::select::{Binding, Implementation, expect_bound, resolve};

const BINDINGS: [Binding; Op::COUNT] = {
    let first = expect_bound(resolve(Op::ALL[0], BuildConfig::TARGET));
    let mut out = [first; Op::COUNT];
    let mut i = 1;
    while i < Op::COUNT {
        out[i] = expect_bound(resolve(Op::ALL[i], BuildConfig::TARGET));
        i += 1;
    }
    out
};

/// What this build binds for `op`.
#[inline]
pub const fn binding(op: Op) -> Binding {
    BINDINGS[op as usize]
}

/// Bindings of every operation, indexed by `Op as usize`.
#[inline]
pub const fn bindings() -> &'static [Binding; Op::COUNT] {
    &BINDINGS
}

/// The reserved-name routine this build keeps for `op`, if any.
#[inline]
pub const fn internal(op: Op) -> Option<Implementation> {
    BINDINGS[op as usize].internal
}

macro_rules! bound_fns {
    ($(
        $(#[$meta:meta])*
        $name:ident = $op:ident.$accessor:ident($($arg:ident: $ty:ty),*) -> $ret:ty;
    )*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name($($arg: $ty),*) -> $ret {
                const F: fn($($ty),*) -> $ret =
                    match BINDINGS[Op::$op as usize].public.kernel.$accessor() {
                        Some(f) => f,
                        None => panic!("bound kernel has the wrong signature"),
                    };
                F($($arg),*)
            }
        )*
    };
}

// ============================================================================
// Single precision (wrapped family)
// ============================================================================

bound_fns! {
    /// Arc cosine.
    acosf = Acosf.unary_f32(x: f32) -> f32;
    /// Arc sine.
    asinf = Asinf.unary_f32(x: f32) -> f32;
    /// Arc tangent of `y / x`, quadrant-aware.
    atan2f = Atan2f.binary_f32(y: f32, x: f32) -> f32;
    /// Hyperbolic cosine.
    coshf = Coshf.unary_f32(x: f32) -> f32;
    /// `e^x`.
    expf = Expf.unary_f32(x: f32) -> f32;
    /// Remainder of `x / y` truncated toward zero.
    fmodf = Fmodf.binary_f32(x: f32, y: f32) -> f32;
    /// Base-10 logarithm.
    log10f = Log10f.unary_f32(x: f32) -> f32;
    /// Natural logarithm.
    logf = Logf.unary_f32(x: f32) -> f32;
    /// `x^y`.
    powf = Powf.binary_f32(x: f32, y: f32) -> f32;
    /// IEEE remainder, quotient rounded to nearest.
    remainderf = Remainderf.binary_f32(x: f32, y: f32) -> f32;
    /// Hyperbolic sine.
    sinhf = Sinhf.unary_f32(x: f32) -> f32;
    /// Square root.
    sqrtf = Sqrtf.unary_f32(x: f32) -> f32;
}

// ============================================================================
// Double precision (ISA-tiered family)
// ============================================================================

bound_fns! {
    /// `e^x`.
    exp = Exp.unary_f64(x: f64) -> f64;
    /// `2^x`.
    exp2 = Exp2.unary_f64(x: f64) -> f64;
    /// Natural logarithm.
    log = Log.unary_f64(x: f64) -> f64;
    /// Base-2 logarithm.
    log2 = Log2.unary_f64(x: f64) -> f64;
    /// `x^y`.
    pow = Pow.binary_f64(x: f64, y: f64) -> f64;
    /// Smallest integer not less than `x`.
    ceil = Ceil.unary_f64(x: f64) -> f64;
    /// Largest integer not greater than `x`.
    floor = Floor.unary_f64(x: f64) -> f64;
    /// `(fractional, integral)` parts, both with the sign of `x`.
    modf = Modf.split_f64(x: f64) -> (f64, f64);
    /// Nearest integer, ties to even.
    rint = Rint.unary_f64(x: f64) -> f64;
    /// Integer part, rounding toward zero.
    trunc = Trunc.unary_f64(x: f64) -> f64;
}

// ============================================================================
// Extended precision leaves
// ============================================================================

bound_fns! {
    /// Arc tangent.
    atanl = Atanl.unary_f80(x: F80) -> F80;
    /// Unbiased exponent as a value.
    logbl = Logbl.unary_f80(x: F80) -> F80;
    /// Significand scaled into `[1, 2)`.
    significandl = Significandl.unary_f80(x: F80) -> F80;
}
