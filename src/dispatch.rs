//! Runtime ISA detection with memoized dispatch.
//!
//! [`crate::bound`] binds for the ISA level the build was compiled for. A
//! binary built for the x86-64 baseline can still use the dedicated kernels
//! on a newer CPU by going through [`Dispatch`]: the running CPU's level is
//! detected once per process, optionally capped by the
//! `TIERED_LIBM_HWCAPS` environment variable, and the tiered double family
//! is resolved against it. The dedicated kernels it binds carry their own
//! `multiversion` clones, so on an FMA-capable CPU the x86-64-v3 tier runs
//! the fused instructions even in a baseline build.
//!
//! ```rust
//! use tiered_libm::dispatch::Dispatch;
//!
//! let d = Dispatch::get();
//! assert_eq!(d.floor(-0.5), -1.0);
//! println!("running at {}", d.config().isa);
//! ```

use std::sync::OnceLock;

use tracing::{debug, trace, warn};

use crate::config::{BuildConfig, IsaLevel};
use crate::error::SelectError;
use crate::kernel::Signature;
use crate::op::Op;
use crate::select::{Binding, resolve};

/// Environment variable capping the detected level, e.g. `x86-64-v2`.
pub const HWCAPS_ENV: &str = "TIERED_LIBM_HWCAPS";

static DISPATCH: OnceLock<Dispatch> = OnceLock::new();

/// Highest [`IsaLevel`] the running CPU supports.
pub fn detect_isa() -> IsaLevel {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        let v2 = is_x86_feature_detected!("sse4.1")
            && is_x86_feature_detected!("sse4.2")
            && is_x86_feature_detected!("ssse3")
            && is_x86_feature_detected!("popcnt");
        let v3 = v2
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
            && is_x86_feature_detected!("bmi2");
        let v4 = v3
            && is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("avx512bw")
            && is_x86_feature_detected!("avx512dq")
            && is_x86_feature_detected!("avx512vl");
        if v4 {
            return IsaLevel::Avx512;
        }
        if v3 {
            return IsaLevel::Avx2;
        }
        if v2 {
            return IsaLevel::Sse41;
        }
    }
    IsaLevel::Baseline
}

/// Parses a cap value. Empty means no cap; anything unparseable is logged
/// and ignored.
pub fn parse_hwcaps(value: &str) -> Option<IsaLevel> {
    if value.trim().is_empty() {
        return None;
    }
    match value.parse::<IsaLevel>() {
        Ok(level) => Some(level),
        Err(err) => {
            warn!(var = HWCAPS_ENV, %err, "ignoring hwcaps cap");
            None
        }
    }
}

fn hwcaps_from_env() -> Option<IsaLevel> {
    std::env::var(HWCAPS_ENV).ok().as_deref().and_then(parse_hwcaps)
}

fn unary(config: BuildConfig, op: Op) -> Result<fn(f64) -> f64, SelectError> {
    let kernel = resolve(op, config)?.public.kernel;
    kernel.unary_f64().ok_or(SelectError::SignatureMismatch {
        op,
        expected: Signature::UnaryF64,
        found: kernel.signature(),
    })
}

fn binary(config: BuildConfig, op: Op) -> Result<fn(f64, f64) -> f64, SelectError> {
    let kernel = resolve(op, config)?.public.kernel;
    kernel.binary_f64().ok_or(SelectError::SignatureMismatch {
        op,
        expected: Signature::BinaryF64,
        found: kernel.signature(),
    })
}

fn split(config: BuildConfig, op: Op) -> Result<fn(f64) -> (f64, f64), SelectError> {
    let kernel = resolve(op, config)?.public.kernel;
    kernel.split_f64().ok_or(SelectError::SignatureMismatch {
        op,
        expected: Signature::SplitF64,
        found: kernel.signature(),
    })
}

/// Tiered double-precision family resolved for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Dispatch {
    config: BuildConfig,
    detected: IsaLevel,
    exp: fn(f64) -> f64,
    exp2: fn(f64) -> f64,
    log: fn(f64) -> f64,
    log2: fn(f64) -> f64,
    pow: fn(f64, f64) -> f64,
    ceil: fn(f64) -> f64,
    floor: fn(f64) -> f64,
    rint: fn(f64) -> f64,
    trunc: fn(f64) -> f64,
    modf: fn(f64) -> (f64, f64),
}

impl Dispatch {
    /// Process-wide dispatch, detected on first use.
    pub fn get() -> &'static Dispatch {
        DISPATCH.get_or_init(|| {
            let detected = detect_isa();
            let cap = hwcaps_from_env();
            Dispatch::new(detected, cap).unwrap_or_else(|err| {
                warn!(%err, "runtime resolution failed, using static bindings");
                Dispatch::fixed()
            })
        })
    }

    /// Resolve for a CPU at `detected`, lowered to `cap` when given. A cap
    /// above the detected level has no effect.
    pub fn new(detected: IsaLevel, cap: Option<IsaLevel>) -> Result<Self, SelectError> {
        let isa = match cap {
            Some(cap) if cap < detected => cap,
            _ => detected,
        };
        let config = BuildConfig::TARGET.with_isa(isa);
        debug!(%detected, ?cap, effective = %isa, arch = %config.arch, "resolved runtime isa level");

        let d = Dispatch {
            config,
            detected,
            exp: unary(config, Op::Exp)?,
            exp2: unary(config, Op::Exp2)?,
            log: unary(config, Op::Log)?,
            log2: unary(config, Op::Log2)?,
            pow: binary(config, Op::Pow)?,
            ceil: unary(config, Op::Ceil)?,
            floor: unary(config, Op::Floor)?,
            rint: unary(config, Op::Rint)?,
            trunc: unary(config, Op::Trunc)?,
            modf: split(config, Op::Modf)?,
        };
        for op in Op::ALL.into_iter().filter(|op| op.isa_threshold().is_some()) {
            let b = resolve(op, config)?;
            trace!(binding = %b, "runtime binding");
        }
        Ok(d)
    }

    /// The bindings this build was compiled with, no detection.
    pub fn fixed() -> Self {
        use crate::bound;
        Dispatch {
            config: BuildConfig::TARGET,
            detected: BuildConfig::TARGET.isa,
            exp: bound::exp,
            exp2: bound::exp2,
            log: bound::log,
            log2: bound::log2,
            pow: bound::pow,
            ceil: bound::ceil,
            floor: bound::floor,
            rint: bound::rint,
            trunc: bound::trunc,
            modf: bound::modf,
        }
    }

    /// Configuration the family was resolved against.
    pub fn config(&self) -> BuildConfig {
        self.config
    }

    /// Level reported by the CPU, before any cap.
    pub fn detected(&self) -> IsaLevel {
        self.detected
    }

    /// Binding of any operation under this configuration.
    pub fn binding(&self, op: Op) -> Result<Binding, SelectError> {
        resolve(op, self.config)
    }

    /// `e^x`.
    #[inline]
    pub fn exp(&self, x: f64) -> f64 {
        (self.exp)(x)
    }

    /// `2^x`.
    #[inline]
    pub fn exp2(&self, x: f64) -> f64 {
        (self.exp2)(x)
    }

    /// Natural logarithm.
    #[inline]
    pub fn log(&self, x: f64) -> f64 {
        (self.log)(x)
    }

    /// Base-2 logarithm.
    #[inline]
    pub fn log2(&self, x: f64) -> f64 {
        (self.log2)(x)
    }

    /// `x^y`.
    #[inline]
    pub fn pow(&self, x: f64, y: f64) -> f64 {
        (self.pow)(x, y)
    }

    /// Round toward +∞.
    #[inline]
    pub fn ceil(&self, x: f64) -> f64 {
        (self.ceil)(x)
    }

    /// Round toward -∞.
    #[inline]
    pub fn floor(&self, x: f64) -> f64 {
        (self.floor)(x)
    }

    /// Round to nearest, ties to even.
    #[inline]
    pub fn rint(&self, x: f64) -> f64 {
        (self.rint)(x)
    }

    /// Round toward zero.
    #[inline]
    pub fn trunc(&self, x: f64) -> f64 {
        (self.trunc)(x)
    }

    /// `(fractional, integral)` parts.
    #[inline]
    pub fn modf(&self, x: f64) -> (f64, f64) {
        (self.modf)(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArchFamily;
    use crate::select::ImplKind;

    #[test]
    fn test_get_is_memoized() {
        let a = Dispatch::get();
        let b = Dispatch::get();
        assert!(std::ptr::eq(a, b));
        assert!(a.config().isa <= a.detected());
    }

    #[test]
    fn test_cap_only_lowers() {
        let d = Dispatch::new(IsaLevel::Avx512, Some(IsaLevel::Sse41)).unwrap();
        assert_eq!(d.config().isa, IsaLevel::Sse41);
        assert_eq!(d.detected(), IsaLevel::Avx512);

        let d = Dispatch::new(IsaLevel::Baseline, Some(IsaLevel::Avx2)).unwrap();
        assert_eq!(d.config().isa, IsaLevel::Baseline);

        let d = Dispatch::new(IsaLevel::Avx2, None).unwrap();
        assert_eq!(d.config().isa, IsaLevel::Avx2);
    }

    #[test]
    fn test_tiers_follow_level() {
        if BuildConfig::TARGET.arch != ArchFamily::X86_64 {
            eprintln!("skipping: tiers only differ on x86_64");
            return;
        }
        let low = Dispatch::new(IsaLevel::Baseline, None).unwrap();
        let mid = Dispatch::new(IsaLevel::Sse41, None).unwrap();
        let high = Dispatch::new(IsaLevel::Avx2, None).unwrap();
        assert_eq!(low.binding(Op::Floor).unwrap().public.kind, ImplKind::Generic);
        assert_eq!(mid.binding(Op::Floor).unwrap().public.kind, ImplKind::Dedicated);
        assert_eq!(mid.binding(Op::Exp).unwrap().public.kind, ImplKind::Generic);
        assert_eq!(high.binding(Op::Exp).unwrap().public.kind, ImplKind::Dedicated);
    }

    #[test]
    fn test_every_level_computes_the_same_values() {
        for level in IsaLevel::ALL {
            let d = Dispatch::new(level, None).unwrap();
            assert_eq!(d.floor(-2.5), -3.0, "{level}");
            assert_eq!(d.ceil(-2.5), -2.0, "{level}");
            assert_eq!(d.rint(-2.5), -2.0, "{level}");
            assert_eq!(d.trunc(-2.5), -2.0, "{level}");
            assert_eq!(d.modf(2.25), (0.25, 2.0), "{level}");
            assert_eq!(d.exp(0.0), 1.0, "{level}");
            assert_eq!(d.exp2(-3.0), 0.125, "{level}");
            assert_eq!(d.log(1.0), 0.0, "{level}");
            assert!((d.log2(8.0) - 3.0).abs() < 1e-15, "{level}");
            assert!((d.pow(3.0, 4.0) - 81.0).abs() < 1e-13, "{level}");
        }
    }

    #[test]
    fn test_avx2_tier_runs_fused_kernels() {
        use crate::arch::x86_64::{exp_with, pow_with};
        use crate::mlaf::{Fused, Unfused};

        if BuildConfig::TARGET.arch != ArchFamily::X86_64 {
            eprintln!("skipping: tiers only differ on x86_64");
            return;
        }
        let d = Dispatch::new(IsaLevel::Avx2, None).unwrap();
        assert_eq!(d.binding(Op::Pow).unwrap().public.symbol, "__pow_fma");

        let mut differs = 0;
        for i in 0..200 {
            let x = 0.75 + i as f64 * 3.17;
            for j in 0..100 {
                let y = -15.0 + j as f64 * 0.311;
                let got = d.pow(x, y);
                assert_eq!(got.to_bits(), pow_with::<Fused>(x, y).to_bits(), "pow({x}, {y})");
                if got.to_bits() != pow_with::<Unfused>(x, y).to_bits() {
                    differs += 1;
                }
            }
            let x = i as f64 * 0.37 - 30.0;
            assert_eq!(d.exp(x).to_bits(), exp_with::<Fused>(x).to_bits(), "exp({x})");
        }
        assert!(differs > 0, "avx2 tier produced the unfused results");
    }

    #[test]
    fn test_fixed_matches_static_bindings() {
        let d = Dispatch::fixed();
        assert_eq!(d.config(), BuildConfig::TARGET);
        assert_eq!(d.floor(1.5), crate::bound::floor(1.5));
    }

    #[test]
    fn test_parse_hwcaps() {
        assert_eq!(parse_hwcaps("x86-64-v2"), Some(IsaLevel::Sse41));
        assert_eq!(parse_hwcaps(" avx2 "), Some(IsaLevel::Avx2));
        assert_eq!(parse_hwcaps(""), None);
        assert_eq!(parse_hwcaps("pentium-mmx"), None);
    }
}
