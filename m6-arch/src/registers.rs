//! Identification Register Access
//!
//! Raw reads of the ID and configuration registers that describe what a
//! CPU implements. These helpers touch nothing but the register itself, so
//! they are safe to call on a CPU that is still coming up and has no
//! per-CPU state yet.

use aarch64_cpu::registers::{
    CNTFRQ_EL0, ID_AA64ISAR0_EL1, ID_AA64ISAR1_EL1, ID_AA64MMFR0_EL1, ID_AA64PFR0_EL1,
    ID_AA64PFR1_EL1, MIDR_EL1,
};
use core::arch::asm;
use tock_registers::interfaces::Readable;

/// Read a system register by name with `mrs`.
///
/// Used for registers that aarch64-cpu does not model yet.
macro_rules! read_sysreg {
    ($name:literal) => {{
        let value: u64;
        // SAFETY: ID registers are readable at EL1 and have no side effects
        unsafe {
            asm!(concat!("mrs {}, ", $name), out(reg) value, options(nomem, nostack));
        }
        value
    }};
}

/// Read MIDR_EL1 (Main ID Register)
#[must_use]
#[inline]
pub fn read_midr_el1() -> u64 {
    MIDR_EL1.get()
}

/// Read ID_AA64PFR0_EL1 (Processor Feature Register 0)
#[must_use]
#[inline]
pub fn read_id_aa64pfr0_el1() -> u64 {
    ID_AA64PFR0_EL1.get()
}

/// Read ID_AA64PFR1_EL1 (Processor Feature Register 1)
#[must_use]
#[inline]
pub fn read_id_aa64pfr1_el1() -> u64 {
    ID_AA64PFR1_EL1.get()
}

/// Read ID_AA64DFR0_EL1 (Debug Feature Register 0)
#[must_use]
#[inline]
pub fn read_id_aa64dfr0_el1() -> u64 {
    read_sysreg!("id_aa64dfr0_el1")
}

/// Read ID_AA64DFR1_EL1 (Debug Feature Register 1)
#[must_use]
#[inline]
pub fn read_id_aa64dfr1_el1() -> u64 {
    read_sysreg!("id_aa64dfr1_el1")
}

/// Read ID_AA64MMFR0_EL1 (Memory Model Feature Register 0)
#[must_use]
#[inline]
pub fn read_id_aa64mmfr0_el1() -> u64 {
    ID_AA64MMFR0_EL1.get()
}

/// Read ID_AA64MMFR1_EL1 (Memory Model Feature Register 1)
///
/// Note: not yet available in aarch64-cpu crate
#[must_use]
#[inline]
pub fn read_id_aa64mmfr1_el1() -> u64 {
    read_sysreg!("id_aa64mmfr1_el1")
}

/// Read ID_AA64MMFR2_EL1 (Memory Model Feature Register 2)
///
/// Encoded as S3_0_C0_C7_2 since older assemblers lack the name.
#[must_use]
#[inline]
pub fn read_id_aa64mmfr2_el1() -> u64 {
    read_sysreg!("s3_0_c0_c7_2")
}

/// Read ID_AA64ISAR0_EL1 (Instruction Set Attribute Register 0)
#[must_use]
#[inline]
pub fn read_id_aa64isar0_el1() -> u64 {
    ID_AA64ISAR0_EL1.get()
}

/// Read ID_AA64ISAR1_EL1 (Instruction Set Attribute Register 1)
#[must_use]
#[inline]
pub fn read_id_aa64isar1_el1() -> u64 {
    ID_AA64ISAR1_EL1.get()
}

/// Read CTR_EL0 (Cache Type Register)
#[must_use]
#[inline]
pub fn read_ctr_el0() -> u64 {
    read_sysreg!("ctr_el0")
}

/// Read DCZID_EL0 (Data Cache Zero ID Register)
#[must_use]
#[inline]
pub fn read_dczid_el0() -> u64 {
    read_sysreg!("dczid_el0")
}

/// Read CNTFRQ_EL0 (Counter-timer Frequency Register)
#[must_use]
#[inline]
pub fn read_cntfrq_el0() -> u64 {
    CNTFRQ_EL0.get()
}

/// Generate raw readers for the AArch32 ID registers.
///
/// They are still readable from AArch64 EL1 and describe what the CPU
/// offers to 32-bit code.
macro_rules! aarch32_id_readers {
    ($($(#[$doc:meta])* $func:ident => $name:literal;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            #[inline]
            pub fn $func() -> u64 {
                read_sysreg!($name)
            }
        )*
    };
}

aarch32_id_readers! {
    /// Read ID_PFR0_EL1 (AArch32 Processor Feature Register 0)
    read_id_pfr0_el1 => "id_pfr0_el1";
    /// Read ID_PFR1_EL1 (AArch32 Processor Feature Register 1)
    read_id_pfr1_el1 => "id_pfr1_el1";
    /// Read ID_DFR0_EL1 (AArch32 Debug Feature Register 0)
    read_id_dfr0_el1 => "id_dfr0_el1";
    /// Read ID_MMFR0_EL1 (AArch32 Memory Model Feature Register 0)
    read_id_mmfr0_el1 => "id_mmfr0_el1";
    /// Read ID_MMFR1_EL1 (AArch32 Memory Model Feature Register 1)
    read_id_mmfr1_el1 => "id_mmfr1_el1";
    /// Read ID_MMFR2_EL1 (AArch32 Memory Model Feature Register 2)
    read_id_mmfr2_el1 => "id_mmfr2_el1";
    /// Read ID_MMFR3_EL1 (AArch32 Memory Model Feature Register 3)
    read_id_mmfr3_el1 => "id_mmfr3_el1";
    /// Read ID_ISAR0_EL1 (AArch32 Instruction Set Attribute Register 0)
    read_id_isar0_el1 => "id_isar0_el1";
    /// Read ID_ISAR1_EL1 (AArch32 Instruction Set Attribute Register 1)
    read_id_isar1_el1 => "id_isar1_el1";
    /// Read ID_ISAR2_EL1 (AArch32 Instruction Set Attribute Register 2)
    read_id_isar2_el1 => "id_isar2_el1";
    /// Read ID_ISAR3_EL1 (AArch32 Instruction Set Attribute Register 3)
    read_id_isar3_el1 => "id_isar3_el1";
    /// Read ID_ISAR4_EL1 (AArch32 Instruction Set Attribute Register 4)
    read_id_isar4_el1 => "id_isar4_el1";
    /// Read ID_ISAR5_EL1 (AArch32 Instruction Set Attribute Register 5)
    read_id_isar5_el1 => "id_isar5_el1";
    /// Read MVFR0_EL1 (AArch32 Media and VFP Feature Register 0)
    read_mvfr0_el1 => "mvfr0_el1";
    /// Read MVFR1_EL1 (AArch32 Media and VFP Feature Register 1)
    read_mvfr1_el1 => "mvfr1_el1";
    /// Read MVFR2_EL1 (AArch32 Media and VFP Feature Register 2)
    read_mvfr2_el1 => "mvfr2_el1";
}
