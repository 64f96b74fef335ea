//! Multiply-add evaluation for the dedicated kernels.
//!
//! The kernels are written once, generic over [`MulAddMode`]. The shipped
//! instantiation is [`Fused`]: one rounding per multiply-add, which lowers
//! to a single instruction inside the `fma` clones `multiversion` builds
//! (and on targets compiled with `fma`), and to a correctly rounded
//! software `fma` elsewhere. The result is the same either way, so a
//! kernel computes identical values on every host.

use num_traits::MulAdd;

/// How `acc + a * b` is rounded.
pub(crate) trait MulAddMode {
    /// `acc + a * b`.
    fn mla(acc: f64, a: f64, b: f64) -> f64;

    /// `acc - a * b`.
    #[inline(always)]
    fn neg_mla(acc: f64, a: f64, b: f64) -> f64 {
        Self::mla(acc, a, -b)
    }

    /// Horner evaluation of `c[0] + x*(c[1] + x*(c[2] + ...))`.
    #[inline(always)]
    fn horner(x: f64, coeffs: &[f64]) -> f64 {
        let mut acc = 0.0;
        for &c in coeffs.iter().rev() {
            acc = Self::mla(c, acc, x);
        }
        acc
    }
}

/// Single rounding.
pub(crate) struct Fused;

impl MulAddMode for Fused {
    #[inline(always)]
    fn mla(acc: f64, a: f64, b: f64) -> f64 {
        MulAdd::mul_add(a, b, acc)
    }
}

/// Multiply, round, add, round.
#[cfg(test)]
pub(crate) struct Unfused;

#[cfg(test)]
impl MulAddMode for Unfused {
    #[inline(always)]
    fn mla(acc: f64, a: f64, b: f64) -> f64 {
        acc + a * b
    }
}

/// Whether the compile target guarantees a hardware FMA instruction.
///
/// Without it the dedicated kernels still fuse, picking the hardware
/// instruction per call site through their `multiversion` clones.
pub const HAS_FMA: bool = cfg!(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
));
