//! Compile-time implementation selection.
//!
//! [`resolve`] maps an operation and a [`BuildConfig`] to the implementation
//! a build binds under the operation's public name. It is a `const fn`, so
//! the binding for [`BuildConfig::TARGET`] is computed during compilation and
//! the bound function pointer folds into a direct call (see
//! [`crate::bound`]). Any other configuration can be resolved at run time
//! to inspect what that build would bind.
//!
//! The rules, in order:
//!
//! 1. Single-precision wrapped operations: when the family keeps an
//!    optimized routine and the build is shared, the routine stays under its
//!    reserved `__ieee754_` name and the public name binds the
//!    compatibility wrapper. Otherwise the public name binds the generic
//!    template.
//! 2. Double-precision tiered operations: x86-64 builds at or above the
//!    operation's ISA threshold bind the dedicated kernel; everything else
//!    binds the generic one.
//! 3. Extended-precision leaves: x87 families bind the FPU routine,
//!    everything else the portable one.

use alloc::vec::Vec;
use core::fmt;

use crate::arch::{m68k, x86_64, x87};
use crate::config::{ArchFamily, BuildConfig, IsaLevel};
use crate::error::SelectError;
use crate::kernel::Kernel;
use crate::op::{Op, OpGroup};
use crate::{compat, ldbl, template};

/// Flavor of an implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplKind {
    /// Portable template instantiation or portable kernel.
    Generic,
    /// Family-optimized routine living under a reserved internal name.
    ArchOptimized,
    /// Public-name wrapper delegating to an [`ImplKind::ArchOptimized`] routine.
    CompatWrapper,
    /// ISA-tier kernel for x86-64.
    Dedicated,
    /// x87 FPU routine.
    X87,
}

impl ImplKind {
    /// Short lowercase label.
    pub const fn name(self) -> &'static str {
        match self {
            ImplKind::Generic => "generic",
            ImplKind::ArchOptimized => "arch-optimized",
            ImplKind::CompatWrapper => "compat-wrapper",
            ImplKind::Dedicated => "dedicated",
            ImplKind::X87 => "x87",
        }
    }
}

impl fmt::Display for ImplKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete implementation of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Implementation {
    /// Symbol the implementation is exported under.
    pub symbol: &'static str,
    /// Flavor.
    pub kind: ImplKind,
    /// Family restriction. `None` for portable code and for x87 routines,
    /// which every x87 family shares.
    pub arch: Option<ArchFamily>,
    /// Lowest ISA level the implementation may be bound at.
    pub min_isa: IsaLevel,
    /// Entry point.
    pub kernel: Kernel,
}

impl Implementation {
    const fn new(
        symbol: &'static str,
        kind: ImplKind,
        arch: Option<ArchFamily>,
        min_isa: IsaLevel,
        kernel: Kernel,
    ) -> Self {
        Self {
            symbol,
            kind,
            arch,
            min_isa,
            kernel,
        }
    }

    /// Whether this implementation could be bound on `arch`.
    pub const fn available_on(&self, arch: ArchFamily) -> bool {
        match (self.kind, self.arch) {
            (ImplKind::X87, _) => arch.has_x87(),
            (_, Some(owner)) => owner.is(arch),
            (_, None) => true,
        }
    }
}

impl PartialEq for Implementation {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.kind == other.kind
            && self.arch == other.arch
            && self.min_isa == other.min_isa
    }
}

impl Eq for Implementation {}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}", self.symbol, self.kind)?;
        if let Some(arch) = self.arch {
            write!(f, ", {arch}")?;
        }
        if self.min_isa != IsaLevel::Baseline {
            write!(f, ", {}+", self.min_isa)?;
        }
        f.write_str("]")
    }
}

/// What a build binds for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Operation.
    pub op: Op,
    /// Implementation bound under the public name.
    pub public: Implementation,
    /// Optimized routine under its reserved internal name, when the family
    /// has one for this operation.
    pub internal: Option<Implementation>,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.op, self.public)?;
        if let Some(internal) = self.internal {
            write!(f, " (internal {internal})")?;
        }
        Ok(())
    }
}

// ============================================================================
// Implementation tables
// ============================================================================

const fn generic_kernel(op: Op) -> Kernel {
    use Kernel::*;
    match op {
        Op::Acosf => UnaryF32(template::acos::<f32>),
        Op::Asinf => UnaryF32(template::asin::<f32>),
        Op::Atan2f => BinaryF32(template::atan2::<f32>),
        Op::Coshf => UnaryF32(template::cosh::<f32>),
        Op::Expf => UnaryF32(template::exp::<f32>),
        Op::Fmodf => BinaryF32(template::fmod::<f32>),
        Op::Log10f => UnaryF32(template::log10::<f32>),
        Op::Logf => UnaryF32(template::log::<f32>),
        Op::Powf => BinaryF32(template::pow::<f32>),
        Op::Remainderf => BinaryF32(template::remainder::<f32>),
        Op::Sinhf => UnaryF32(template::sinh::<f32>),
        Op::Sqrtf => UnaryF32(template::sqrt::<f32>),
        Op::Exp => UnaryF64(template::exp::<f64>),
        Op::Exp2 => UnaryF64(template::exp2::<f64>),
        Op::Log => UnaryF64(template::log::<f64>),
        Op::Log2 => UnaryF64(template::log2::<f64>),
        Op::Pow => BinaryF64(template::pow::<f64>),
        Op::Ceil => UnaryF64(libm::ceil),
        Op::Floor => UnaryF64(libm::floor),
        Op::Modf => SplitF64(libm::modf),
        Op::Rint => UnaryF64(libm::rint),
        Op::Trunc => UnaryF64(libm::trunc),
        Op::Atanl => UnaryF80(ldbl::atanl),
        Op::Logbl => UnaryF80(ldbl::logbl),
        Op::Significandl => UnaryF80(ldbl::significandl),
    }
}

/// Portable implementation. Exists for every operation.
const fn generic(op: Op) -> Implementation {
    Implementation::new(
        op.name(),
        ImplKind::Generic,
        None,
        IsaLevel::Baseline,
        generic_kernel(op),
    )
}

/// Family-optimized routine under its reserved name.
const fn arch_optimized(op: Op, arch: ArchFamily) -> Option<Implementation> {
    if !arch.is(ArchFamily::M68k) {
        return None;
    }
    use Kernel::*;
    let (symbol, kernel) = match op {
        Op::Acosf => ("__ieee754_acosf", UnaryF32(m68k::ieee754_acosf)),
        Op::Asinf => ("__ieee754_asinf", UnaryF32(m68k::ieee754_asinf)),
        Op::Atan2f => ("__ieee754_atan2f", BinaryF32(m68k::ieee754_atan2f)),
        Op::Coshf => ("__ieee754_coshf", UnaryF32(m68k::ieee754_coshf)),
        Op::Expf => ("__ieee754_expf", UnaryF32(m68k::ieee754_expf)),
        Op::Fmodf => ("__ieee754_fmodf", BinaryF32(m68k::ieee754_fmodf)),
        Op::Log10f => ("__ieee754_log10f", UnaryF32(m68k::ieee754_log10f)),
        Op::Logf => ("__ieee754_logf", UnaryF32(m68k::ieee754_logf)),
        Op::Powf => ("__ieee754_powf", BinaryF32(m68k::ieee754_powf)),
        Op::Remainderf => ("__ieee754_remainderf", BinaryF32(m68k::ieee754_remainderf)),
        Op::Sinhf => ("__ieee754_sinhf", UnaryF32(m68k::ieee754_sinhf)),
        Op::Sqrtf => ("__ieee754_sqrtf", UnaryF32(m68k::ieee754_sqrtf)),
        _ => return None,
    };
    Some(Implementation::new(
        symbol,
        ImplKind::ArchOptimized,
        Some(ArchFamily::M68k),
        IsaLevel::Baseline,
        kernel,
    ))
}

/// Public-name wrapper over the m68k routine.
const fn compat_wrapper(op: Op) -> Option<Implementation> {
    use Kernel::*;
    let kernel = match op {
        Op::Acosf => UnaryF32(compat::acosf),
        Op::Asinf => UnaryF32(compat::asinf),
        Op::Atan2f => BinaryF32(compat::atan2f),
        Op::Coshf => UnaryF32(compat::coshf),
        Op::Expf => UnaryF32(compat::expf),
        Op::Fmodf => BinaryF32(compat::fmodf),
        Op::Log10f => UnaryF32(compat::log10f),
        Op::Logf => UnaryF32(compat::logf),
        Op::Powf => BinaryF32(compat::powf),
        Op::Remainderf => BinaryF32(compat::remainderf),
        Op::Sinhf => UnaryF32(compat::sinhf),
        Op::Sqrtf => UnaryF32(compat::sqrtf),
        _ => return None,
    };
    Some(Implementation::new(
        op.name(),
        ImplKind::CompatWrapper,
        Some(ArchFamily::M68k),
        IsaLevel::Baseline,
        kernel,
    ))
}

/// x86-64 ISA-tier kernel.
const fn dedicated(op: Op) -> Option<Implementation> {
    let OpGroup::Tiered(threshold) = op.group() else {
        return None;
    };
    use Kernel::*;
    let (symbol, kernel) = match op {
        Op::Exp => ("__exp_fma", UnaryF64(x86_64::exp_fma)),
        Op::Exp2 => ("__exp2_fma", UnaryF64(x86_64::exp2_fma)),
        Op::Log => ("__log_fma", UnaryF64(x86_64::log_fma)),
        Op::Log2 => ("__log2_fma", UnaryF64(x86_64::log2_fma)),
        Op::Pow => ("__pow_fma", BinaryF64(x86_64::pow_fma)),
        Op::Ceil => ("__ceil_sse41", UnaryF64(x86_64::ceil_sse41)),
        Op::Floor => ("__floor_sse41", UnaryF64(x86_64::floor_sse41)),
        Op::Modf => ("__modf_sse41", SplitF64(x86_64::modf_sse41)),
        Op::Rint => ("__rint_sse41", UnaryF64(x86_64::rint_sse41)),
        Op::Trunc => ("__trunc_sse41", UnaryF64(x86_64::trunc_sse41)),
        _ => return None,
    };
    Some(Implementation::new(
        symbol,
        ImplKind::Dedicated,
        Some(ArchFamily::X86_64),
        threshold,
        kernel,
    ))
}

/// x87 FPU leaf.
const fn x87_leaf(op: Op) -> Option<Implementation> {
    use Kernel::*;
    let (symbol, kernel) = match op {
        Op::Atanl => ("__atanl", UnaryF80(x87::atanl)),
        Op::Logbl => ("__logbl", UnaryF80(x87::logbl)),
        Op::Significandl => ("__significandl", UnaryF80(x87::significandl)),
        _ => return None,
    };
    Some(Implementation::new(
        symbol,
        ImplKind::X87,
        None,
        IsaLevel::Baseline,
        kernel,
    ))
}

// ============================================================================
// Resolution
// ============================================================================

/// Bind `op` under `config`.
///
/// Pure and total over the shipped catalogue: every combination resolves,
/// which [`ALL_CONFIGURATIONS_RESOLVE`] checks on every build.
pub const fn resolve(op: Op, config: BuildConfig) -> Result<Binding, SelectError> {
    let (public, internal) = match op.group() {
        OpGroup::Wrapped => {
            let internal = arch_optimized(op, config.arch);
            let public = match internal {
                Some(_) if config.shared => compat_wrapper(op),
                _ => Some(generic(op)),
            };
            (public, internal)
        }
        OpGroup::Tiered(threshold) => {
            let public = if config.arch.is(ArchFamily::X86_64) && config.isa.at_least(threshold) {
                dedicated(op)
            } else {
                Some(generic(op))
            };
            (public, None)
        }
        OpGroup::Leaf => {
            let public = if config.arch.has_x87() {
                x87_leaf(op)
            } else {
                Some(generic(op))
            };
            (public, None)
        }
    };

    let Some(public) = public else {
        return Err(SelectError::Unresolved { op, config });
    };
    let expected = op.signature();
    let found = public.kernel.signature();
    if expected as u8 != found as u8 {
        return Err(SelectError::SignatureMismatch {
            op,
            expected,
            found,
        });
    }
    Ok(Binding {
        op,
        public,
        internal,
    })
}

/// Unwrap a resolution during constant evaluation.
///
/// # Panics
///
/// On any error. In a `const` context the panic is a compile error, so an
/// operation left without an implementation fails the build.
pub const fn expect_bound(result: Result<Binding, SelectError>) -> Binding {
    match result {
        Ok(binding) => binding,
        Err(SelectError::Unresolved { .. }) => {
            panic!("operation has no implementation for this build configuration")
        }
        Err(SelectError::SignatureMismatch { .. }) => {
            panic!("bound kernel signature does not match the operation")
        }
    }
}

/// Every (operation, configuration) pair resolves.
pub const ALL_CONFIGURATIONS_RESOLVE: () = {
    let configs = BuildConfig::all();
    let mut c = 0;
    while c < configs.len() {
        let mut o = 0;
        while o < Op::COUNT {
            let _ = expect_bound(resolve(Op::ALL[o], configs[c]));
            o += 1;
        }
        c += 1;
    }
};

const _: () = ALL_CONFIGURATIONS_RESOLVE;

/// Every implementation that some configuration can bind for `op`,
/// highest ISA level first. Internal reserved-name routines are included.
pub fn implementations(op: Op) -> Vec<Implementation> {
    let mut out: Vec<Implementation> = [
        dedicated(op),
        x87_leaf(op),
        compat_wrapper(op),
        arch_optimized(op, ArchFamily::M68k),
        Some(generic(op)),
    ]
    .into_iter()
    .flatten()
    .collect();
    out.sort_by(|a, b| b.min_isa.cmp(&a.min_isa));
    out
}

/// Bindings of every operation under `config`, in catalogue order.
pub fn bindings(config: BuildConfig) -> impl Iterator<Item = Binding> {
    Op::ALL
        .into_iter()
        .filter_map(move |op| resolve(op, config).ok())
}
