//! Typed entry points of a single implementation.

use core::fmt;

use crate::f80::F80;

/// Call signature of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// `fn(f32) -> f32`
    UnaryF32,
    /// `fn(f32, f32) -> f32`
    BinaryF32,
    /// `fn(f64) -> f64`
    UnaryF64,
    /// `fn(f64, f64) -> f64`
    BinaryF64,
    /// `fn(f64) -> (fractional, integral)`
    SplitF64,
    /// `fn(F80) -> F80`
    UnaryF80,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signature::UnaryF32 => "fn(f32) -> f32",
            Signature::BinaryF32 => "fn(f32, f32) -> f32",
            Signature::UnaryF64 => "fn(f64) -> f64",
            Signature::BinaryF64 => "fn(f64, f64) -> f64",
            Signature::SplitF64 => "fn(f64) -> (f64, f64)",
            Signature::UnaryF80 => "fn(F80) -> F80",
        })
    }
}

/// A plain function pointer tagged with its signature.
///
/// All accessors are `const fn`, so a kernel picked during constant
/// evaluation folds into a direct call.
#[derive(Clone, Copy)]
pub enum Kernel {
    /// Single-precision unary.
    UnaryF32(fn(f32) -> f32),
    /// Single-precision binary.
    BinaryF32(fn(f32, f32) -> f32),
    /// Double-precision unary.
    UnaryF64(fn(f64) -> f64),
    /// Double-precision binary.
    BinaryF64(fn(f64, f64) -> f64),
    /// Double-precision split into `(fractional, integral)`.
    SplitF64(fn(f64) -> (f64, f64)),
    /// Extended-precision unary.
    UnaryF80(fn(F80) -> F80),
}

impl Kernel {
    /// Signature of the wrapped pointer.
    pub const fn signature(&self) -> Signature {
        match self {
            Kernel::UnaryF32(_) => Signature::UnaryF32,
            Kernel::BinaryF32(_) => Signature::BinaryF32,
            Kernel::UnaryF64(_) => Signature::UnaryF64,
            Kernel::BinaryF64(_) => Signature::BinaryF64,
            Kernel::SplitF64(_) => Signature::SplitF64,
            Kernel::UnaryF80(_) => Signature::UnaryF80,
        }
    }

    /// The pointer, if this is a `fn(f32) -> f32` kernel.
    #[inline]
    pub const fn unary_f32(&self) -> Option<fn(f32) -> f32> {
        match *self {
            Kernel::UnaryF32(f) => Some(f),
            _ => None,
        }
    }

    /// The pointer, if this is a `fn(f32, f32) -> f32` kernel.
    #[inline]
    pub const fn binary_f32(&self) -> Option<fn(f32, f32) -> f32> {
        match *self {
            Kernel::BinaryF32(f) => Some(f),
            _ => None,
        }
    }

    /// The pointer, if this is a `fn(f64) -> f64` kernel.
    #[inline]
    pub const fn unary_f64(&self) -> Option<fn(f64) -> f64> {
        match *self {
            Kernel::UnaryF64(f) => Some(f),
            _ => None,
        }
    }

    /// The pointer, if this is a `fn(f64, f64) -> f64` kernel.
    #[inline]
    pub const fn binary_f64(&self) -> Option<fn(f64, f64) -> f64> {
        match *self {
            Kernel::BinaryF64(f) => Some(f),
            _ => None,
        }
    }

    /// The pointer, if this is a `fn(f64) -> (f64, f64)` kernel.
    #[inline]
    pub const fn split_f64(&self) -> Option<fn(f64) -> (f64, f64)> {
        match *self {
            Kernel::SplitF64(f) => Some(f),
            _ => None,
        }
    }

    /// The pointer, if this is a `fn(F80) -> F80` kernel.
    #[inline]
    pub const fn unary_f80(&self) -> Option<fn(F80) -> F80> {
        match *self {
            Kernel::UnaryF80(f) => Some(f),
            _ => None,
        }
    }

    /// Calls a `fn(f32) -> f32` kernel.
    #[inline]
    pub fn call_f32(&self, x: f32) -> Option<f32> {
        self.unary_f32().map(|f| f(x))
    }

    /// Calls a `fn(f32, f32) -> f32` kernel.
    #[inline]
    pub fn call2_f32(&self, x: f32, y: f32) -> Option<f32> {
        self.binary_f32().map(|f| f(x, y))
    }

    /// Calls a `fn(f64) -> f64` kernel.
    #[inline]
    pub fn call_f64(&self, x: f64) -> Option<f64> {
        self.unary_f64().map(|f| f(x))
    }

    /// Calls a `fn(f64, f64) -> f64` kernel.
    #[inline]
    pub fn call2_f64(&self, x: f64, y: f64) -> Option<f64> {
        self.binary_f64().map(|f| f(x, y))
    }

    /// Calls a `fn(f64) -> (f64, f64)` kernel.
    #[inline]
    pub fn call_split_f64(&self, x: f64) -> Option<(f64, f64)> {
        self.split_f64().map(|f| f(x))
    }

    /// Calls a `fn(F80) -> F80` kernel.
    #[inline]
    pub fn call_f80(&self, x: F80) -> Option<F80> {
        self.unary_f80().map(|f| f(x))
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kernel({})", self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(x: f64) -> f64 {
        x * 2.0
    }

    #[test]
    fn test_accessors_match_variant() {
        let k = Kernel::UnaryF64(double);
        assert_eq!(k.signature(), Signature::UnaryF64);
        assert_eq!(k.unary_f64().map(|f| f(2.5)), Some(5.0));
        assert!(k.unary_f32().is_none());
        assert!(k.binary_f64().is_none());
        assert!(k.split_f64().is_none());
        assert!(k.unary_f80().is_none());
    }

    #[test]
    fn test_call_helpers() {
        let k = Kernel::UnaryF64(double);
        assert_eq!(k.call_f64(4.0), Some(8.0));
        assert_eq!(k.call_f32(4.0), None);
        assert_eq!(k.call2_f64(1.0, 2.0), None);
        let split = Kernel::SplitF64(|x| (x - 1.0, 1.0));
        assert_eq!(split.call_split_f64(1.5), Some((0.5, 1.0)));

        let mul = Kernel::BinaryF32(|x, y| x * y);
        assert_eq!(mul.call2_f32(3.0, 4.0), Some(12.0));
        assert_eq!(mul.call_f32(3.0), None);

        let neg = Kernel::UnaryF80(|x| -x);
        assert_eq!(neg.call_f80(F80::ONE), Some(-F80::ONE));
        assert_eq!(neg.call_f64(1.0), None);
    }

    #[test]
    fn test_const_extraction() {
        const F: Option<fn(f64) -> f64> = Kernel::UnaryF64(double).unary_f64();
        let Some(f) = F else {
            panic!("const extraction lost the pointer");
        };
        assert_eq!(f(1.0), 2.0);
    }
}
