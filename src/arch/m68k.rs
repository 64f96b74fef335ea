//! Motorola 68k single-precision internals.
//!
//! The 68881/68882 evaluate every single-precision operation in extended
//! precision and round once on store. These routines do the same one step
//! down: widen to `f64`, evaluate, round to `f32`. They never classify
//! errors; on m68k shared builds the public names belong to the
//! compatibility wrappers, which classify and then call in here.

#[inline]
fn widened(x: f32, f: fn(f64) -> f64) -> f32 {
    f(x as f64) as f32
}

#[inline]
fn widened2(x: f32, y: f32, f: fn(f64, f64) -> f64) -> f32 {
    f(x as f64, y as f64) as f32
}

/// `__ieee754_acosf`
pub fn ieee754_acosf(x: f32) -> f32 {
    widened(x, libm::acos)
}

/// `__ieee754_asinf`
pub fn ieee754_asinf(x: f32) -> f32 {
    widened(x, libm::asin)
}

/// `__ieee754_atan2f`
pub fn ieee754_atan2f(y: f32, x: f32) -> f32 {
    widened2(y, x, libm::atan2)
}

/// `__ieee754_coshf`
pub fn ieee754_coshf(x: f32) -> f32 {
    widened(x, libm::cosh)
}

/// `__ieee754_expf`
pub fn ieee754_expf(x: f32) -> f32 {
    widened(x, libm::exp)
}

/// `__ieee754_fmodf`. Exact in any width.
pub fn ieee754_fmodf(x: f32, y: f32) -> f32 {
    widened2(x, y, libm::fmod)
}

/// `__ieee754_log10f`
pub fn ieee754_log10f(x: f32) -> f32 {
    widened(x, libm::log10)
}

/// `__ieee754_logf`
pub fn ieee754_logf(x: f32) -> f32 {
    widened(x, libm::log)
}

/// `__ieee754_powf`
pub fn ieee754_powf(x: f32, y: f32) -> f32 {
    widened2(x, y, libm::pow)
}

/// `__ieee754_remainderf`. Exact in any width.
pub fn ieee754_remainderf(x: f32, y: f32) -> f32 {
    widened2(x, y, libm::remainder)
}

/// `__ieee754_sinhf`
pub fn ieee754_sinhf(x: f32) -> f32 {
    widened(x, libm::sinh)
}

/// `__ieee754_sqrtf`. Double rounding through `f64` is harmless for sqrt.
pub fn ieee754_sqrtf(x: f32) -> f32 {
    widened(x, libm::sqrt)
}
