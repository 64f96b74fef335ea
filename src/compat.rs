//! Compatibility wrappers for the m68k single-precision family.
//!
//! On shared m68k builds the optimized routines keep their reserved
//! `__ieee754_<name>f` names and these wrappers own the public names. Each
//! one classifies the call exactly like the generic template, then
//! delegates to the internal routine, so callers see the same error
//! reporting whichever implementation is bound.

use crate::arch::m68k;
use crate::error::{MathError, record};
use crate::template::{
    check_exp_range, check_log_domain, check_overflow, check_pow, check_remainder_domain,
    check_unit_domain,
};

/// `acosf` over `__ieee754_acosf`.
pub fn acosf(x: f32) -> f32 {
    check_unit_domain(x);
    m68k::ieee754_acosf(x)
}

/// `asinf` over `__ieee754_asinf`.
pub fn asinf(x: f32) -> f32 {
    check_unit_domain(x);
    m68k::ieee754_asinf(x)
}

/// `atan2f` over `__ieee754_atan2f`.
pub fn atan2f(y: f32, x: f32) -> f32 {
    m68k::ieee754_atan2f(y, x)
}

/// `coshf` over `__ieee754_coshf`.
pub fn coshf(x: f32) -> f32 {
    let r = m68k::ieee754_coshf(x);
    check_overflow(x, r);
    r
}

/// `expf` over `__ieee754_expf`.
pub fn expf(x: f32) -> f32 {
    let r = m68k::ieee754_expf(x);
    check_exp_range(x, r);
    r
}

/// `fmodf` over `__ieee754_fmodf`.
pub fn fmodf(x: f32, y: f32) -> f32 {
    check_remainder_domain(x, y);
    m68k::ieee754_fmodf(x, y)
}

/// `log10f` over `__ieee754_log10f`.
pub fn log10f(x: f32) -> f32 {
    check_log_domain(x);
    m68k::ieee754_log10f(x)
}

/// `logf` over `__ieee754_logf`.
pub fn logf(x: f32) -> f32 {
    check_log_domain(x);
    m68k::ieee754_logf(x)
}

/// `powf` over `__ieee754_powf`.
pub fn powf(x: f32, y: f32) -> f32 {
    let r = m68k::ieee754_powf(x, y);
    check_pow(x, y, r);
    r
}

/// `remainderf` over `__ieee754_remainderf`.
pub fn remainderf(x: f32, y: f32) -> f32 {
    check_remainder_domain(x, y);
    m68k::ieee754_remainderf(x, y)
}

/// `sinhf` over `__ieee754_sinhf`.
pub fn sinhf(x: f32) -> f32 {
    let r = m68k::ieee754_sinhf(x);
    check_overflow(x, r);
    r
}

/// `sqrtf` over `__ieee754_sqrtf`.
pub fn sqrtf(x: f32) -> f32 {
    if x < 0.0 {
        record(MathError::Domain);
    }
    m68k::ieee754_sqrtf(x)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::error::take_last_error;
    use crate::template;

    #[test]
    fn test_errors_match_template() {
        type Pair = (fn(f32) -> f32, fn(f32) -> f32, f32);
        let cases: [Pair; 7] = [
            (acosf, template::acos::<f32>, 2.0),
            (asinf, template::asin::<f32>, -1.5),
            (logf, template::log::<f32>, 0.0),
            (log10f, template::log10::<f32>, -3.0),
            (expf, template::exp::<f32>, 200.0),
            (coshf, template::cosh::<f32>, 100.0),
            (sqrtf, template::sqrt::<f32>, -4.0),
        ];
        for (wrapper, generic, x) in cases {
            let _ = take_last_error();
            let _ = wrapper(x);
            let from_wrapper = take_last_error();
            let _ = generic(x);
            let from_template = take_last_error();
            assert!(from_wrapper.is_some(), "no error recorded for {x}");
            assert_eq!(from_wrapper, from_template, "x = {x}");
        }
    }

    #[test]
    fn test_binary_wrappers() {
        let _ = take_last_error();
        assert!(fmodf(3.0, 0.0).is_nan());
        assert_eq!(take_last_error(), Some(MathError::Domain));
        assert!(remainderf(f32::INFINITY, 2.0).is_nan());
        assert_eq!(take_last_error(), Some(MathError::Domain));
        assert_eq!(powf(0.0, -2.0), f32::INFINITY);
        assert_eq!(take_last_error(), Some(MathError::Pole));
        assert_eq!(powf(2.0, 10.0), 1024.0);
        assert_eq!(atan2f(0.0, -1.0), core::f32::consts::PI);
        assert_eq!(take_last_error(), None);
    }
}
