//! Generic, width-parameterized wrapper implementations.
//!
//! Each wrapper classifies its arguments and result the way the C library
//! wrappers do, records a [`MathError`] when the call hits a domain, pole or
//! range error, and returns the portable kernel's result unchanged. They are
//! instantiated for `f32` and `f64` through [`MathFloat`].

use crate::error::{MathError, record};
use crate::float::{MathFloat, is_integer};

/// `|x| > 1` is outside the domain of `acos`/`asin`.
#[inline]
pub(crate) fn check_unit_domain<T: MathFloat>(x: T) {
    if x.abs() > T::one() {
        record(MathError::Domain);
    }
}

/// `x < 0` is a domain error, `x == 0` a pole, for the logarithms.
#[inline]
pub(crate) fn check_log_domain<T: MathFloat>(x: T) {
    if x < T::zero() {
        record(MathError::Domain);
    } else if x == T::zero() {
        record(MathError::Pole);
    }
}

/// Finite argument with an infinite or zero result is a range error.
#[inline]
pub(crate) fn check_exp_range<T: MathFloat>(x: T, r: T) {
    if x.is_finite() {
        if r.is_infinite() {
            record(MathError::Overflow);
        } else if r == T::zero() {
            record(MathError::Underflow);
        }
    }
}

/// Finite argument with an infinite result overflowed.
#[inline]
pub(crate) fn check_overflow<T: MathFloat>(x: T, r: T) {
    if x.is_finite() && r.is_infinite() {
        record(MathError::Overflow);
    }
}

/// `fmod`/`remainder`: zero divisor or infinite dividend.
#[inline]
pub(crate) fn check_remainder_domain<T: MathFloat>(x: T, y: T) {
    if !x.is_nan() && !y.is_nan() && (y == T::zero() || x.is_infinite()) {
        record(MathError::Domain);
    }
}

/// `pow` classification, from its result.
#[inline]
pub(crate) fn check_pow<T: MathFloat>(x: T, y: T, r: T) {
    if !(x.is_finite() && y.is_finite()) {
        return;
    }
    if r.is_nan() {
        // negative base, non-integer exponent
        debug_assert!(x < T::zero() && !is_integer(y));
        record(MathError::Domain);
    } else if r.is_infinite() {
        record(if x == T::zero() { MathError::Pole } else { MathError::Overflow });
    } else if r == T::zero() && x != T::zero() {
        record(MathError::Underflow);
    }
}

/// `acos` wrapper.
pub fn acos<T: MathFloat>(x: T) -> T {
    check_unit_domain(x);
    x.k_acos()
}

/// `asin` wrapper.
pub fn asin<T: MathFloat>(x: T) -> T {
    check_unit_domain(x);
    x.k_asin()
}

/// `atan2` wrapper. Defined everywhere; nothing to classify.
pub fn atan2<T: MathFloat>(y: T, x: T) -> T {
    y.k_atan2(x)
}

/// `cosh` wrapper.
pub fn cosh<T: MathFloat>(x: T) -> T {
    let r = x.k_cosh();
    check_overflow(x, r);
    r
}

/// `sinh` wrapper.
pub fn sinh<T: MathFloat>(x: T) -> T {
    let r = x.k_sinh();
    check_overflow(x, r);
    r
}

/// `exp` wrapper.
pub fn exp<T: MathFloat>(x: T) -> T {
    let r = x.k_exp();
    check_exp_range(x, r);
    r
}

/// `exp2` wrapper.
pub fn exp2<T: MathFloat>(x: T) -> T {
    let r = x.k_exp2();
    check_exp_range(x, r);
    r
}

/// `log` wrapper.
pub fn log<T: MathFloat>(x: T) -> T {
    check_log_domain(x);
    x.k_log()
}

/// `log2` wrapper.
pub fn log2<T: MathFloat>(x: T) -> T {
    check_log_domain(x);
    x.k_log2()
}

/// `log10` wrapper.
pub fn log10<T: MathFloat>(x: T) -> T {
    check_log_domain(x);
    x.k_log10()
}

/// `pow` wrapper.
pub fn pow<T: MathFloat>(x: T, y: T) -> T {
    let r = x.k_pow(y);
    check_pow(x, y, r);
    r
}

/// `fmod` wrapper.
pub fn fmod<T: MathFloat>(x: T, y: T) -> T {
    check_remainder_domain(x, y);
    x.k_fmod(y)
}

/// `remainder` wrapper.
pub fn remainder<T: MathFloat>(x: T, y: T) -> T {
    check_remainder_domain(x, y);
    x.k_remainder(y)
}

/// `sqrt` wrapper.
pub fn sqrt<T: MathFloat>(x: T) -> T {
    if x < T::zero() {
        record(MathError::Domain);
    }
    x.k_sqrt()
}
