//! Catalogue of named operations.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::config::{FloatWidth, IsaLevel};
use crate::error::ConfigError;
use crate::kernel::Signature;

/// A named numeric operation, by its C name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    // Single precision, wrapped family
    /// `acosf`
    Acosf,
    /// `asinf`
    Asinf,
    /// `atan2f`
    Atan2f,
    /// `coshf`
    Coshf,
    /// `expf`
    Expf,
    /// `fmodf`
    Fmodf,
    /// `log10f`
    Log10f,
    /// `logf`
    Logf,
    /// `powf`
    Powf,
    /// `remainderf`
    Remainderf,
    /// `sinhf`
    Sinhf,
    /// `sqrtf`
    Sqrtf,

    // Double precision, ISA-tiered family
    /// `exp`
    Exp,
    /// `exp2`
    Exp2,
    /// `log`
    Log,
    /// `log2`
    Log2,
    /// `pow`
    Pow,
    /// `ceil`
    Ceil,
    /// `floor`
    Floor,
    /// `modf`
    Modf,
    /// `rint`
    Rint,
    /// `trunc`
    Trunc,

    // Extended precision leaves
    /// `atanl`
    Atanl,
    /// `logbl`
    Logbl,
    /// `significandl`
    Significandl,
}

/// How the selector treats an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpGroup {
    /// Public name owned by a wrapper; some families keep an optimized
    /// routine under a reserved internal name.
    Wrapped,
    /// Double-precision operation with a dedicated x86-64 kernel from the
    /// given level upward.
    Tiered(IsaLevel),
    /// Extended-precision leaf, bound directly with no wrapper.
    Leaf,
}

impl Op {
    /// Number of operations.
    pub const COUNT: usize = 25;

    /// Every operation, in declaration order (`ALL[op as usize] == op`).
    pub const ALL: [Op; Op::COUNT] = [
        Op::Acosf,
        Op::Asinf,
        Op::Atan2f,
        Op::Coshf,
        Op::Expf,
        Op::Fmodf,
        Op::Log10f,
        Op::Logf,
        Op::Powf,
        Op::Remainderf,
        Op::Sinhf,
        Op::Sqrtf,
        Op::Exp,
        Op::Exp2,
        Op::Log,
        Op::Log2,
        Op::Pow,
        Op::Ceil,
        Op::Floor,
        Op::Modf,
        Op::Rint,
        Op::Trunc,
        Op::Atanl,
        Op::Logbl,
        Op::Significandl,
    ];

    /// C name of the public symbol.
    pub const fn name(self) -> &'static str {
        match self {
            Op::Acosf => "acosf",
            Op::Asinf => "asinf",
            Op::Atan2f => "atan2f",
            Op::Coshf => "coshf",
            Op::Expf => "expf",
            Op::Fmodf => "fmodf",
            Op::Log10f => "log10f",
            Op::Logf => "logf",
            Op::Powf => "powf",
            Op::Remainderf => "remainderf",
            Op::Sinhf => "sinhf",
            Op::Sqrtf => "sqrtf",
            Op::Exp => "exp",
            Op::Exp2 => "exp2",
            Op::Log => "log",
            Op::Log2 => "log2",
            Op::Pow => "pow",
            Op::Ceil => "ceil",
            Op::Floor => "floor",
            Op::Modf => "modf",
            Op::Rint => "rint",
            Op::Trunc => "trunc",
            Op::Atanl => "atanl",
            Op::Logbl => "logbl",
            Op::Significandl => "significandl",
        }
    }

    /// Operand width.
    pub const fn width(self) -> FloatWidth {
        match self.signature() {
            Signature::UnaryF32 | Signature::BinaryF32 => FloatWidth::Single,
            Signature::UnaryF64 | Signature::BinaryF64 | Signature::SplitF64 => FloatWidth::Double,
            Signature::UnaryF80 => FloatWidth::Extended,
        }
    }

    /// Call signature every implementation of this operation must have.
    pub const fn signature(self) -> Signature {
        match self {
            Op::Atan2f | Op::Fmodf | Op::Powf | Op::Remainderf => Signature::BinaryF32,
            Op::Acosf
            | Op::Asinf
            | Op::Coshf
            | Op::Expf
            | Op::Log10f
            | Op::Logf
            | Op::Sinhf
            | Op::Sqrtf => Signature::UnaryF32,
            Op::Pow => Signature::BinaryF64,
            Op::Modf => Signature::SplitF64,
            Op::Exp
            | Op::Exp2
            | Op::Log
            | Op::Log2
            | Op::Ceil
            | Op::Floor
            | Op::Rint
            | Op::Trunc => Signature::UnaryF64,
            Op::Atanl | Op::Logbl | Op::Significandl => Signature::UnaryF80,
        }
    }

    /// Selection group, with the ISA threshold for tiered operations.
    ///
    /// Transcendentals need FMA (x86-64-v3); the rounding family only needs
    /// `roundsd` (SSE4.1).
    pub const fn group(self) -> OpGroup {
        match self {
            Op::Exp | Op::Exp2 | Op::Log | Op::Log2 | Op::Pow => OpGroup::Tiered(IsaLevel::Avx2),
            Op::Ceil | Op::Floor | Op::Modf | Op::Rint | Op::Trunc => {
                OpGroup::Tiered(IsaLevel::Sse41)
            }
            Op::Atanl | Op::Logbl | Op::Significandl => OpGroup::Leaf,
            _ => OpGroup::Wrapped,
        }
    }

    /// ISA level from which x86-64 builds bind a dedicated kernel.
    pub const fn isa_threshold(self) -> Option<IsaLevel> {
        match self.group() {
            OpGroup::Tiered(level) => Some(level),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Op {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Op::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ConfigError::UnknownOp(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_indexed_by_discriminant() {
        for (i, op) in Op::ALL.iter().enumerate() {
            assert_eq!(*op as usize, i, "{op} out of place");
        }
    }

    #[test]
    fn test_names_parse_back() {
        for op in Op::ALL {
            assert_eq!(op.name().parse::<Op>().unwrap(), op);
        }
        assert!("cbrtf".parse::<Op>().is_err());
    }

    #[test]
    fn test_width_matches_suffix() {
        for op in Op::ALL {
            let suffix = op.width().suffix();
            match op.width() {
                FloatWidth::Double => assert!(!op.name().ends_with('f') || op.name() == "modf"),
                _ => assert!(op.name().ends_with(suffix), "{op} should end with {suffix}"),
            }
        }
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(Op::Exp.isa_threshold(), Some(IsaLevel::Avx2));
        assert_eq!(Op::Modf.isa_threshold(), Some(IsaLevel::Sse41));
        assert_eq!(Op::Acosf.isa_threshold(), None);
        assert_eq!(Op::Logbl.group(), OpGroup::Leaf);
    }
}
