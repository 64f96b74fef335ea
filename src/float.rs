//! Width-generic float trait used by the template wrappers.
//!
//! One implementation per width maps every operation onto the portable
//! `libm` kernel for that width, so a template written once over
//! `T: MathFloat` instantiates to `acosf` for `f32` and `acos` for `f64`.

use num_traits::Float;

/// Float type a generic template can be instantiated for.
pub trait MathFloat: Float + core::fmt::Debug {
    /// Width of this type.
    const WIDTH: crate::config::FloatWidth;

    /// `acos`
    fn k_acos(self) -> Self;
    /// `asin`
    fn k_asin(self) -> Self;
    /// `atan2(self, x)`
    fn k_atan2(self, x: Self) -> Self;
    /// `cosh`
    fn k_cosh(self) -> Self;
    /// `sinh`
    fn k_sinh(self) -> Self;
    /// `exp`
    fn k_exp(self) -> Self;
    /// `exp2`
    fn k_exp2(self) -> Self;
    /// `log`
    fn k_log(self) -> Self;
    /// `log2`
    fn k_log2(self) -> Self;
    /// `log10`
    fn k_log10(self) -> Self;
    /// `pow`
    fn k_pow(self, y: Self) -> Self;
    /// `fmod`
    fn k_fmod(self, y: Self) -> Self;
    /// `remainder`
    fn k_remainder(self, y: Self) -> Self;
    /// `sqrt`
    fn k_sqrt(self) -> Self;
}

macro_rules! impl_math_float {
    ($ty:ty, $width:expr, {
        acos: $acos:path, asin: $asin:path, atan2: $atan2:path,
        cosh: $cosh:path, sinh: $sinh:path,
        exp: $exp:path, exp2: $exp2:path,
        log: $log:path, log2: $log2:path, log10: $log10:path,
        pow: $pow:path, fmod: $fmod:path, remainder: $remainder:path,
        sqrt: $sqrt:path $(,)?
    }) => {
        impl MathFloat for $ty {
            const WIDTH: crate::config::FloatWidth = $width;

            #[inline]
            fn k_acos(self) -> Self {
                $acos(self)
            }
            #[inline]
            fn k_asin(self) -> Self {
                $asin(self)
            }
            #[inline]
            fn k_atan2(self, x: Self) -> Self {
                $atan2(self, x)
            }
            #[inline]
            fn k_cosh(self) -> Self {
                $cosh(self)
            }
            #[inline]
            fn k_sinh(self) -> Self {
                $sinh(self)
            }
            #[inline]
            fn k_exp(self) -> Self {
                $exp(self)
            }
            #[inline]
            fn k_exp2(self) -> Self {
                $exp2(self)
            }
            #[inline]
            fn k_log(self) -> Self {
                $log(self)
            }
            #[inline]
            fn k_log2(self) -> Self {
                $log2(self)
            }
            #[inline]
            fn k_log10(self) -> Self {
                $log10(self)
            }
            #[inline]
            fn k_pow(self, y: Self) -> Self {
                $pow(self, y)
            }
            #[inline]
            fn k_fmod(self, y: Self) -> Self {
                $fmod(self, y)
            }
            #[inline]
            fn k_remainder(self, y: Self) -> Self {
                $remainder(self, y)
            }
            #[inline]
            fn k_sqrt(self) -> Self {
                $sqrt(self)
            }
        }
    };
}

impl_math_float!(f32, crate::config::FloatWidth::Single, {
    acos: libm::acosf, asin: libm::asinf, atan2: libm::atan2f,
    cosh: libm::coshf, sinh: libm::sinhf,
    exp: libm::expf, exp2: libm::exp2f,
    log: libm::logf, log2: libm::log2f, log10: libm::log10f,
    pow: libm::powf, fmod: libm::fmodf, remainder: libm::remainderf,
    sqrt: libm::sqrtf,
});

impl_math_float!(f64, crate::config::FloatWidth::Double, {
    acos: libm::acos, asin: libm::asin, atan2: libm::atan2,
    cosh: libm::cosh, sinh: libm::sinh,
    exp: libm::exp, exp2: libm::exp2,
    log: libm::log, log2: libm::log2, log10: libm::log10,
    pow: libm::pow, fmod: libm::fmod, remainder: libm::remainder,
    sqrt: libm::sqrt,
});

/// `y` is an integer value.
#[inline]
pub(crate) fn is_integer<T: Float>(y: T) -> bool {
    y.is_finite() && y.trunc() == y
}

/// `y` is an odd integer value.
#[inline]
pub(crate) fn is_odd_integer<T: Float>(y: T) -> bool {
    if !is_integer(y) {
        return false;
    }
    let two = T::one() + T::one();
    let half = y / two;
    half.trunc() != half
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FloatWidth;

    #[test]
    fn test_widths() {
        assert_eq!(<f32 as MathFloat>::WIDTH, FloatWidth::Single);
        assert_eq!(<f64 as MathFloat>::WIDTH, FloatWidth::Double);
    }

    #[test]
    fn test_kernels_agree_across_widths() {
        let x = 0.375f64;
        assert!((x.k_acos() - (x as f32).k_acos() as f64).abs() < 1e-6);
        assert!((x.k_pow(2.5) - (x as f32).k_pow(2.5) as f64).abs() < 1e-6);
        assert_eq!(9f64.k_sqrt(), 3.0);
        assert_eq!(9f32.k_sqrt(), 3.0);
    }

    #[test]
    fn test_integer_predicates() {
        assert!(is_integer(3.0f64));
        assert!(!is_integer(3.5f64));
        assert!(!is_integer(f64::INFINITY));
        assert!(is_odd_integer(-3.0f32));
        assert!(!is_odd_integer(4.0f32));
        assert!(!is_odd_integer(0.5f64));
        // above 2^53 every representable value is even
        assert!(!is_odd_integer(2f64.powi(60)));
    }
}
