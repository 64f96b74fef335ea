//! x87 extended-precision leaves: `atanl` via `fpatan`, `logbl` and
//! `significandl` via `fxtract`.
//!
//! On x86 hosts these run the instructions through inline assembly on
//! 80-bit memory operands. Elsewhere they fall back to [`crate::ldbl`],
//! which agrees bit for bit on `logbl` and `significandl`.

use crate::f80::F80;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod fpu {
    use crate::f80::F80;

    /// 16-byte aligned home for one 80-bit operand.
    #[repr(C, align(16))]
    struct Slot([u8; 16]);

    impl Slot {
        fn new(x: F80) -> Self {
            let mut b = [0u8; 16];
            b[..10].copy_from_slice(&x.to_le_bytes());
            Slot(b)
        }

        fn get(&self) -> F80 {
            let mut b = [0u8; 10];
            b.copy_from_slice(&self.0[..10]);
            F80::from_le_bytes(b)
        }
    }

    macro_rules! x87_unary {
        ($(#[$meta:meta])* $name:ident: $($insn:literal),+ $(,)?) => {
            $(#[$meta])*
            #[allow(unsafe_code)]
            pub(super) fn $name(x: F80) -> F80 {
                let src = Slot::new(x);
                let mut dst = Slot([0; 16]);
                // SAFETY: `src` and `dst` are live, aligned and 16 bytes long;
                // the sequence pushes and pops the same number of registers,
                // leaving the x87 stack empty as the ABI requires.
                unsafe {
                    core::arch::asm!(
                        $($insn,)+
                        src = in(reg) src.0.as_ptr(),
                        dst = in(reg) dst.0.as_mut_ptr(),
                        out("st(0)") _,
                        out("st(1)") _,
                        out("st(2)") _,
                        out("st(3)") _,
                        out("st(4)") _,
                        out("st(5)") _,
                        out("st(6)") _,
                        out("st(7)") _,
                        options(nostack),
                    );
                }
                dst.get()
            }
        };
    }

    x87_unary!(
        /// `atan(x / 1)`
        atan:
        "fld tbyte ptr [{src}]",
        "fld1",
        "fpatan",
        "fstp tbyte ptr [{dst}]",
    );

    x87_unary!(
        /// Exponent half of `fxtract`.
        logb:
        "fld tbyte ptr [{src}]",
        "fxtract",
        "fstp st(0)",
        "fstp tbyte ptr [{dst}]",
    );

    x87_unary!(
        /// Significand half of `fxtract`.
        significand:
        "fld tbyte ptr [{src}]",
        "fxtract",
        "fstp tbyte ptr [{dst}]",
        "fstp st(0)",
    );
}

/// Whether the leaves below execute on the FPU in this build.
pub const HAS_FPU: bool = cfg!(any(target_arch = "x86", target_arch = "x86_64"));

/// `atanl` (`fpatan`).
pub fn atanl(x: F80) -> F80 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        fpu::atan(x)
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        crate::ldbl::atanl(x)
    }
}

/// `logbl` (`fxtract`, exponent).
pub fn logbl(x: F80) -> F80 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        fpu::logb(x)
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        crate::ldbl::logbl(x)
    }
}

/// `significandl` (`fxtract`, significand).
pub fn significandl(x: F80) -> F80 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        fpu::significand(x)
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        crate::ldbl::significandl(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ldbl;

    const SAMPLES: [f64; 10] = [
        1.0,
        -1.0,
        0.5,
        3.0,
        -1e-300,
        1e300,
        12345.678,
        f64::MIN_POSITIVE,
        7.0e-320,
        -0.1,
    ];

    #[test]
    fn test_fxtract_agrees_with_software() {
        for v in SAMPLES {
            let x = F80::from_f64(v);
            assert_eq!(logbl(x).to_bits(), ldbl::logbl(x).to_bits(), "logbl({v:e})");
            assert_eq!(
                significandl(x).to_bits(),
                ldbl::significandl(x).to_bits(),
                "significandl({v:e})"
            );
        }
        // extended denormal, beyond anything f64 can hold
        let d = F80::from_parts(true, 0, 0x0000_0400_0000_0001);
        assert_eq!(logbl(d).to_bits(), ldbl::logbl(d).to_bits());
        assert_eq!(significandl(d).to_bits(), ldbl::significandl(d).to_bits());
    }

    #[test]
    fn test_fxtract_specials() {
        assert_eq!(logbl(F80::ZERO), F80::NEG_INFINITY);
        assert_eq!(logbl(F80::NEG_INFINITY), F80::INFINITY);
        assert_eq!(significandl(F80::NEG_ZERO).to_bits(), F80::NEG_ZERO.to_bits());
        assert_eq!(significandl(F80::INFINITY), F80::INFINITY);
        assert!(logbl(F80::NAN).is_nan());
        assert!(significandl(F80::NAN).is_nan());
    }

    #[test]
    fn test_atanl_close_to_software() {
        for v in SAMPLES {
            let x = F80::from_f64(v);
            let hw = atanl(x).to_f64();
            let sw = ldbl::atanl(x).to_f64();
            let tol = sw.abs() * 4.0 * f64::EPSILON;
            assert!((hw - sw).abs() <= tol, "atanl({v:e}): {hw:e} vs {sw:e}");
        }
        assert_eq!(atanl(F80::INFINITY).to_f64(), core::f64::consts::FRAC_PI_2);
        assert!(atanl(F80::NAN).is_nan());
    }
}
