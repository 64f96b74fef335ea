//! Architecture-specific kernels.
//!
//! Everything here is callable on any host: the x87 leaves fall back to
//! bit-exact software when the compiling target has no x87 unit, and the
//! m68k internals model the 68881's widen-evaluate-round behavior in
//! portable code. What differs per build is only which of them the
//! selector binds.

pub mod m68k;
pub mod x86_64;
pub mod x87;
