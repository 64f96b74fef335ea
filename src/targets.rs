//! `multiversion` target lists, one clone per x86-64 micro-architecture
//! level the selector knows about.

// ============================================================================
// x86/x86_64
// ============================================================================

/// Clones the item for x86-64-v4, -v3 and -v2, with a baseline fallback.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
macro_rules! isa_multiversion {
    ($($item:tt)*) => {
        #[multiversion::multiversion(targets(
            // x86-64-v4 (Skylake-X 2017+, Zen 4 2022+)
            "x86_64+sse3+ssse3+sse4.1+sse4.2+popcnt+avx+avx2+bmi1+bmi2+f16c+fma+lzcnt+movbe+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            // x86-64-v3 (Haswell 2013+, Zen 1 2017+)
            "x86_64+sse3+ssse3+sse4.1+sse4.2+popcnt+avx+avx2+bmi1+bmi2+f16c+fma+lzcnt+movbe",
            // x86-64-v2 (Nehalem 2008+)
            "x86_64+sse3+ssse3+sse4.1+sse4.2+popcnt",
        ))]
        $($item)*
    };
}

// ============================================================================
// aarch64
// ============================================================================

/// Clones the item for NEON with FMA.
#[cfg(target_arch = "aarch64")]
macro_rules! isa_multiversion {
    ($($item:tt)*) => {
        #[multiversion::multiversion(targets(
            "aarch64+neon",
        ))]
        $($item)*
    };
}

// ============================================================================
// Everything else
// ============================================================================

/// No clones.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
macro_rules! isa_multiversion {
    ($($item:tt)*) => {
        $($item)*
    };
}

pub(crate) use isa_multiversion;
