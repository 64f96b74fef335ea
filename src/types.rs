//! POSIX integer type aliases.
//!
//! `ino_t` and `off_t` follow the `file-offset64` feature, the analog of
//! compiling C with `_FILE_OFFSET_BITS=64`. The 64-bit `*64_t` spellings
//! exist regardless. Each alias is an item, so a second definition in the
//! same namespace is a compile error.

#![allow(non_camel_case_types)]

/// Identifier able to hold a pid, uid or gid.
pub type id_t = u32;

/// File serial number.
#[cfg(not(feature = "file-offset64"))]
pub type ino_t = u32;
/// File serial number.
#[cfg(feature = "file-offset64")]
pub type ino_t = u64;

/// File size or offset.
#[cfg(not(feature = "file-offset64"))]
pub type off_t = i32;
/// File size or offset.
#[cfg(feature = "file-offset64")]
pub type off_t = i64;

/// 64-bit file serial number.
pub type ino64_t = u64;

/// 64-bit file offset.
pub type off64_t = i64;

/// Width in bits of [`off_t`] and [`ino_t`] in this build.
pub const FILE_OFFSET_BITS: u32 = if cfg!(feature = "file-offset64") { 64 } else { 32 };
