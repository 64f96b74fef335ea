//! Error types and the per-thread math error slot.
//!
//! Kernels never return `Result`. Like C's `errno`, a kernel that hits a
//! domain, pole or range error records it in a per-thread slot and still
//! returns the IEEE result. Read the slot with [`take_last_error`].
//!
//! Without the `std` feature there is no thread-local storage and recording
//! is a no-op.

use alloc::string::String;

use thiserror::Error;

use crate::config::BuildConfig;
use crate::kernel::Signature;
use crate::op::Op;

/// Failure to parse a configuration value from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Not a known architecture family name.
    #[error("unknown architecture family `{0}`")]
    UnknownArch(String),
    /// Not a known instruction-set level name.
    #[error("unknown instruction-set level `{0}`")]
    UnknownIsaLevel(String),
    /// Not a known operation name.
    #[error("unknown operation `{0}`")]
    UnknownOp(String),
}

/// Failure to bind an operation to an implementation.
///
/// Inside `const` evaluation this becomes a build failure via
/// [`expect_bound`](crate::select::expect_bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    /// No implementation exists for the operation under this configuration.
    #[error("no implementation of `{op}` for {config}")]
    Unresolved {
        /// Operation being resolved.
        op: Op,
        /// Configuration it was resolved against.
        config: BuildConfig,
    },
    /// The bound kernel was requested with the wrong call signature.
    #[error("`{op}` has a {found} kernel, requested {expected}")]
    SignatureMismatch {
        /// Operation whose kernel was requested.
        op: Op,
        /// Signature the caller asked for.
        expected: Signature,
        /// Signature the kernel actually has.
        found: Signature,
    },
}

/// Error condition recorded by a kernel (the `errno` analog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MathError {
    /// Argument outside the function's domain (`EDOM`); result is NaN.
    #[error("argument outside the domain of the function")]
    Domain,
    /// Exact infinite result from finite arguments (`ERANGE`, divide-by-zero).
    #[error("pole error: exact infinite result from finite arguments")]
    Pole,
    /// Finite arguments, result too large to represent (`ERANGE`).
    #[error("result overflows the destination format")]
    Overflow,
    /// Finite arguments, nonzero result too small to represent (`ERANGE`).
    #[error("result underflows the destination format")]
    Underflow,
}

#[cfg(feature = "std")]
std::thread_local! {
    static LAST_ERROR: core::cell::Cell<Option<MathError>> = const { core::cell::Cell::new(None) };
}

/// Record an error for the calling thread, replacing any earlier one.
#[inline]
pub(crate) fn record(err: MathError) {
    #[cfg(feature = "std")]
    LAST_ERROR.with(|slot| slot.set(Some(err)));
    #[cfg(not(feature = "std"))]
    let _ = err;
}

/// Take the most recent error recorded on this thread, clearing the slot.
///
/// ```rust
/// use tiered_libm::bound;
/// use tiered_libm::error::{MathError, take_last_error};
///
/// let _ = take_last_error();
/// assert!(bound::log(-1.0).is_nan());
/// assert_eq!(take_last_error(), Some(MathError::Domain));
/// ```
#[inline]
pub fn take_last_error() -> Option<MathError> {
    #[cfg(feature = "std")]
    {
        LAST_ERROR.with(core::cell::Cell::take)
    }
    #[cfg(not(feature = "std"))]
    {
        None
    }
}

/// Peek at the most recent error without clearing it.
#[inline]
pub fn last_error() -> Option<MathError> {
    #[cfg(feature = "std")]
    {
        LAST_ERROR.with(core::cell::Cell::get)
    }
    #[cfg(not(feature = "std"))]
    {
        None
    }
}

// ============================================================================
// Result helpers shared by the kernels
// ============================================================================

/// Overflow: records the error and returns a correctly signed infinity.
#[cold]
pub(crate) fn math_oflow(negative: bool) -> f64 {
    record(MathError::Overflow);
    if negative { f64::NEG_INFINITY } else { f64::INFINITY }
}

/// Underflow to zero: records the error and returns a signed zero.
#[cold]
pub(crate) fn math_uflow(negative: bool) -> f64 {
    record(MathError::Underflow);
    if negative { -0.0 } else { 0.0 }
}

/// Pole: records the error and returns a signed infinity.
#[cold]
pub(crate) fn math_divzero(negative: bool) -> f64 {
    record(MathError::Pole);
    if negative { f64::NEG_INFINITY } else { f64::INFINITY }
}

/// Invalid operation. NaN inputs propagate without recording.
#[cold]
pub(crate) fn math_invalid(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    record(MathError::Domain);
    f64::NAN
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_slot_take_clears() {
        let _ = take_last_error();
        record(MathError::Pole);
        assert_eq!(last_error(), Some(MathError::Pole));
        assert_eq!(take_last_error(), Some(MathError::Pole));
        assert_eq!(take_last_error(), None);
    }

    #[test]
    fn test_slot_is_per_thread() {
        let _ = take_last_error();
        record(MathError::Domain);
        let other = std::thread::spawn(take_last_error).join().unwrap();
        assert_eq!(other, None);
        assert_eq!(take_last_error(), Some(MathError::Domain));
    }

    #[test]
    fn test_helpers() {
        let _ = take_last_error();
        assert_eq!(math_oflow(true), f64::NEG_INFINITY);
        assert_eq!(take_last_error(), Some(MathError::Overflow));

        let z = math_uflow(true);
        assert!(z == 0.0 && z.is_sign_negative());
        assert_eq!(take_last_error(), Some(MathError::Underflow));

        assert!(math_invalid(f64::NAN).is_nan());
        assert_eq!(take_last_error(), None);
        assert!(math_invalid(1.0).is_nan());
        assert_eq!(take_last_error(), Some(MathError::Domain));
    }
}
