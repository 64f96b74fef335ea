//! Build configuration: the inputs the selector resolves against.
//!
//! A [`BuildConfig`] is fixed for a compilation unit. [`BuildConfig::TARGET`]
//! is derived from `cfg!` at compile time; any other value can be built by
//! hand to ask what *another* build would bind (that is how the full
//! configuration cross product is tested on a single host).

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;

// ============================================================================
// Architecture family
// ============================================================================

/// Target architecture family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchFamily {
    /// x86-64 (AMD64).
    X86_64,
    /// 32-bit x86 with an x87 FPU.
    I386,
    /// Motorola 68k with a 68881/68882 FPU.
    M68k,
    /// 64-bit ARM.
    Aarch64,
    /// RISC-V (32 or 64 bit).
    Riscv,
    /// Anything else; only generic implementations apply.
    Generic,
}

impl ArchFamily {
    /// Every family, in declaration order.
    pub const ALL: [ArchFamily; 6] = [
        ArchFamily::X86_64,
        ArchFamily::I386,
        ArchFamily::M68k,
        ArchFamily::Aarch64,
        ArchFamily::Riscv,
        ArchFamily::Generic,
    ];

    /// Family of the compiling target.
    pub const TARGET: ArchFamily = if cfg!(target_arch = "x86_64") {
        ArchFamily::X86_64
    } else if cfg!(target_arch = "x86") {
        ArchFamily::I386
    } else if cfg!(target_arch = "m68k") {
        ArchFamily::M68k
    } else if cfg!(target_arch = "aarch64") {
        ArchFamily::Aarch64
    } else if cfg!(any(target_arch = "riscv32", target_arch = "riscv64")) {
        ArchFamily::Riscv
    } else {
        ArchFamily::Generic
    };

    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            ArchFamily::X86_64 => "x86_64",
            ArchFamily::I386 => "i386",
            ArchFamily::M68k => "m68k",
            ArchFamily::Aarch64 => "aarch64",
            ArchFamily::Riscv => "riscv",
            ArchFamily::Generic => "generic",
        }
    }

    /// Whether the family carries an x87 floating-point unit.
    #[inline]
    pub const fn has_x87(self) -> bool {
        matches!(self, ArchFamily::X86_64 | ArchFamily::I386)
    }

    /// `const`-usable equality.
    #[inline]
    pub const fn is(self, other: ArchFamily) -> bool {
        self as u8 == other as u8
    }
}

impl fmt::Display for ArchFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "x86-64" | "amd64" => Ok(ArchFamily::X86_64),
            "i386" | "i486" | "i586" | "i686" | "x86" => Ok(ArchFamily::I386),
            "m68k" | "m680x0" => Ok(ArchFamily::M68k),
            "aarch64" | "arm64" => Ok(ArchFamily::Aarch64),
            "riscv" | "riscv32" | "riscv64" => Ok(ArchFamily::Riscv),
            "generic" => Ok(ArchFamily::Generic),
            _ => Err(ConfigError::UnknownArch(s.to_string())),
        }
    }
}

// ============================================================================
// Instruction-set level
// ============================================================================

/// Ordered instruction-set capability tier.
///
/// The tiers follow the x86-64 micro-architecture levels. On other families
/// only [`IsaLevel::Baseline`] is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IsaLevel {
    /// x86-64-v1: SSE2 baseline.
    Baseline,
    /// x86-64-v2: SSE3, SSSE3, SSE4.1, SSE4.2, POPCNT.
    Sse41,
    /// x86-64-v3: AVX, AVX2, BMI1/2, F16C, FMA, LZCNT, MOVBE.
    Avx2,
    /// x86-64-v4: AVX-512 F/BW/CD/DQ/VL.
    Avx512,
}

impl IsaLevel {
    /// Every level, lowest first.
    pub const ALL: [IsaLevel; 4] = [
        IsaLevel::Baseline,
        IsaLevel::Sse41,
        IsaLevel::Avx2,
        IsaLevel::Avx512,
    ];

    /// Minimum level guaranteed by the compiling target's `target_feature`s.
    pub const TARGET: IsaLevel = if cfg!(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "avx512f",
        target_feature = "avx512bw",
        target_feature = "avx512cd",
        target_feature = "avx512dq",
        target_feature = "avx512vl",
        target_feature = "avx2",
        target_feature = "fma",
    )) {
        IsaLevel::Avx512
    } else if cfg!(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "avx2",
        target_feature = "fma",
        target_feature = "bmi1",
        target_feature = "bmi2",
        target_feature = "lzcnt",
    )) {
        IsaLevel::Avx2
    } else if cfg!(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse3",
        target_feature = "ssse3",
        target_feature = "sse4.1",
        target_feature = "sse4.2",
        target_feature = "popcnt",
    )) {
        IsaLevel::Sse41
    } else {
        IsaLevel::Baseline
    };

    /// `const`-usable ordering test: `self >= threshold`.
    #[inline]
    pub const fn at_least(self, threshold: IsaLevel) -> bool {
        self as u8 >= threshold as u8
    }

    /// glibc-style micro-architecture name (`x86-64-v3`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            IsaLevel::Baseline => "x86-64",
            IsaLevel::Sse41 => "x86-64-v2",
            IsaLevel::Avx2 => "x86-64-v3",
            IsaLevel::Avx512 => "x86-64-v4",
        }
    }
}

impl fmt::Display for IsaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IsaLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" | "x86-64" | "x86-64-v1" | "v1" | "sse2" => Ok(IsaLevel::Baseline),
            "sse4.1" | "sse41" | "x86-64-v2" | "v2" => Ok(IsaLevel::Sse41),
            "avx2" | "x86-64-v3" | "v3" => Ok(IsaLevel::Avx2),
            "avx512" | "x86-64-v4" | "v4" => Ok(IsaLevel::Avx512),
            _ => Err(ConfigError::UnknownIsaLevel(s.to_string())),
        }
    }
}

// ============================================================================
// Operand width
// ============================================================================

/// Floating-point operand width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FloatWidth {
    /// `f32`.
    Single,
    /// `f64`.
    Double,
    /// [`F80`](crate::f80::F80), the x87 `long double`.
    Extended,
}

impl FloatWidth {
    /// C suffix used for names of this width (`f`, none, `l`).
    pub const fn suffix(self) -> &'static str {
        match self {
            FloatWidth::Single => "f",
            FloatWidth::Double => "",
            FloatWidth::Extended => "l",
        }
    }
}

impl fmt::Display for FloatWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FloatWidth::Single => "single",
            FloatWidth::Double => "double",
            FloatWidth::Extended => "extended",
        })
    }
}

// ============================================================================
// Build configuration
// ============================================================================

/// Inputs to implementation selection, fixed per compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildConfig {
    /// Target architecture family.
    pub arch: ArchFamily,
    /// Minimum instruction-set level the build may assume.
    pub isa: IsaLevel,
    /// Whether the build produces a shared artifact needing compat wrappers.
    pub shared: bool,
}

/// Number of configurations in [`BuildConfig::all`].
pub const CONFIG_COUNT: usize = ArchFamily::ALL.len() * IsaLevel::ALL.len() * 2;

impl BuildConfig {
    /// The configuration of this compilation.
    ///
    /// `shared` follows the `shared` cargo feature.
    pub const TARGET: BuildConfig = BuildConfig {
        arch: ArchFamily::TARGET,
        isa: IsaLevel::TARGET,
        shared: cfg!(feature = "shared"),
    };

    /// Create a configuration.
    #[inline]
    pub const fn new(arch: ArchFamily, isa: IsaLevel, shared: bool) -> Self {
        Self { arch, isa, shared }
    }

    /// Copy with a different architecture family.
    #[inline]
    pub const fn with_arch(self, arch: ArchFamily) -> Self {
        Self { arch, ..self }
    }

    /// Copy with a different instruction-set level.
    #[inline]
    pub const fn with_isa(self, isa: IsaLevel) -> Self {
        Self { isa, ..self }
    }

    /// Copy with a different shared flag.
    #[inline]
    pub const fn with_shared(self, shared: bool) -> Self {
        Self { shared, ..self }
    }

    /// The full cross product of architecture × level × shared.
    pub const fn all() -> [BuildConfig; CONFIG_COUNT] {
        let mut out = [BuildConfig::new(ArchFamily::Generic, IsaLevel::Baseline, false); CONFIG_COUNT];
        let mut i = 0;
        let mut a = 0;
        while a < ArchFamily::ALL.len() {
            let mut l = 0;
            while l < IsaLevel::ALL.len() {
                out[i] = BuildConfig::new(ArchFamily::ALL[a], IsaLevel::ALL[l], false);
                out[i + 1] = BuildConfig::new(ArchFamily::ALL[a], IsaLevel::ALL[l], true);
                i += 2;
                l += 1;
            }
            a += 1;
        }
        out
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::TARGET
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.arch,
            self.isa,
            if self.shared { "shared" } else { "static" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isa_ordering() {
        assert!(IsaLevel::Baseline < IsaLevel::Sse41);
        assert!(IsaLevel::Sse41 < IsaLevel::Avx2);
        assert!(IsaLevel::Avx2 < IsaLevel::Avx512);
        for a in IsaLevel::ALL {
            for b in IsaLevel::ALL {
                assert_eq!(a.at_least(b), a >= b, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_cross_product_is_complete() {
        let all = BuildConfig::all();
        assert_eq!(all.len(), 48);
        for arch in ArchFamily::ALL {
            for isa in IsaLevel::ALL {
                for shared in [false, true] {
                    let want = BuildConfig::new(arch, isa, shared);
                    assert_eq!(
                        all.iter().filter(|c| **c == want).count(),
                        1,
                        "missing or duplicate {want}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_target_matches_cfg() {
        #[cfg(target_arch = "x86_64")]
        assert_eq!(BuildConfig::TARGET.arch, ArchFamily::X86_64);
        #[cfg(target_arch = "aarch64")]
        assert_eq!(BuildConfig::TARGET.arch, ArchFamily::Aarch64);
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        assert_eq!(BuildConfig::TARGET.isa, IsaLevel::Baseline);
        assert_eq!(BuildConfig::TARGET.shared, cfg!(feature = "shared"));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("x86-64-v3".parse::<IsaLevel>().unwrap(), IsaLevel::Avx2);
        assert_eq!("SSE4.1".parse::<IsaLevel>().unwrap(), IsaLevel::Sse41);
        assert_eq!("i686".parse::<ArchFamily>().unwrap(), ArchFamily::I386);
        assert_eq!(" m68k ".parse::<ArchFamily>().unwrap(), ArchFamily::M68k);
        assert!(matches!(
            "vax".parse::<ArchFamily>(),
            Err(ConfigError::UnknownArch(name)) if name == "vax"
        ));
        assert!("avx3".parse::<IsaLevel>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for arch in ArchFamily::ALL {
            assert_eq!(arch.to_string().parse::<ArchFamily>().unwrap(), arch);
        }
        for isa in IsaLevel::ALL {
            assert_eq!(isa.to_string().parse::<IsaLevel>().unwrap(), isa);
        }
    }
}
