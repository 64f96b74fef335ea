//! Architecture- and ISA-tiered math primitives with compile-time selection.
//!
//! Every operation in the catalogue has several implementations: a generic
//! template, family-optimized routines, ISA-tier kernels for x86-64 and x87
//! extended-precision leaves. Which one a build uses is decided by
//! [`select::resolve`], a `const fn` over the operation and a
//! [`BuildConfig`], and is fixed during compilation.
//!
//! # Module Organization
//!
//! - [`bound`] - **Recommended API**: one function per operation, statically bound
//! - [`select`] - the selector, its implementation tables and bindings
//! - [`dispatch`] - runtime CPU detection for the tiered double family (`std`)
//! - [`simd`] - four-lane and slice variants of the tiered family
//! - [`config`], [`op`], [`kernel`] - selector inputs and outputs
//! - [`template`], [`compat`], [`arch`], [`ldbl`] - the implementations
//! - [`types`] - POSIX `id_t`, `ino_t`, `off_t`
//!
//! # Quick Start
//!
//! ```rust
//! use tiered_libm::bound::{exp, logbl, significandl, sqrtf};
//! use tiered_libm::F80;
//!
//! assert_eq!(exp(0.0), 1.0);
//! assert_eq!(sqrtf(2.25), 1.5);
//!
//! let x = F80::from_f64(48.0); // 1.5 * 2^5
//! assert_eq!(logbl(x), F80::from_i32(5));
//! assert_eq!(significandl(x), F80::from_f64(1.5));
//! ```
//!
//! # Asking What Another Build Would Bind
//!
//! ```rust
//! use tiered_libm::select::{resolve, ImplKind};
//! use tiered_libm::{ArchFamily, BuildConfig, IsaLevel, Op};
//!
//! let m68k_shared = BuildConfig::new(ArchFamily::M68k, IsaLevel::Baseline, true);
//! let b = resolve(Op::Acosf, m68k_shared).unwrap();
//! assert_eq!(b.public.kind, ImplKind::CompatWrapper);
//! assert_eq!(b.internal.unwrap().symbol, "__ieee754_acosf");
//!
//! let haswell = BuildConfig::new(ArchFamily::X86_64, IsaLevel::Avx2, false);
//! assert_eq!(resolve(Op::Pow, haswell).unwrap().public.symbol, "__pow_fma");
//! ```
//!
//! # Errors
//!
//! Kernels return IEEE results and record domain, pole and range errors in
//! a per-thread slot, like `errno`:
//!
//! ```rust
//! use tiered_libm::{bound, take_last_error, MathError};
//!
//! let _ = take_last_error();
//! assert!(bound::logf(-1.0).is_nan());
//! assert_eq!(take_last_error(), Some(MathError::Domain));
//! ```
//!
//! # Feature Flags
//!
//! - `std` (default): thread-local error slot, runtime dispatch, `multiversion` detection
//! - `shared`: build as a shared artifact; m68k binds the compatibility wrappers
//! - `file-offset64`: 64-bit `off_t` and `ino_t`
//!
//! # `no_std` Support
//!
//! Disable the `std` feature. Error recording becomes a no-op and
//! [`dispatch`] is unavailable:
//!
//! ```toml
//! tiered-libm = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

// ============================================================================
// Public modules
// ============================================================================

/// Operations bound for this build.
pub mod bound;

/// Build configuration: architecture family, ISA level, shared flag.
pub mod config;

/// Operation catalogue.
pub mod op;

/// Typed function pointers.
pub mod kernel;

/// The selector.
pub mod select;

/// Error types and the per-thread math error slot.
pub mod error;

/// x87 extended-precision operand.
pub mod f80;

/// Width-generic float trait.
pub mod float;

/// Generic wrapper templates.
pub mod template;

/// Compatibility wrappers over the m68k internals.
pub mod compat;

/// Architecture-specific kernels.
pub mod arch;

/// Portable extended-precision leaves.
pub mod ldbl;

/// Four-lane and slice entry points.
pub mod simd;

/// POSIX type aliases.
pub mod types;

/// Runtime ISA detection with memoized dispatch.
#[cfg(feature = "std")]
pub mod dispatch;

// ============================================================================
// Internal modules
// ============================================================================

mod mlaf;
mod targets;

pub use mlaf::HAS_FMA;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ArchFamily, BuildConfig, FloatWidth, IsaLevel};
pub use error::{ConfigError, MathError, SelectError, last_error, take_last_error};
pub use f80::F80;
pub use kernel::{Kernel, Signature};
pub use op::Op;
pub use select::{Binding, ImplKind, Implementation, resolve};
