//! Identification registers a capability can be read from
//!
//! The set is closed: a descriptor can only name a register that the
//! platform knows how to read, so there is no run-time "unknown register"
//! case to handle.

use core::fmt;

/// A readable CPU identification or configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SysReg {
    /// Main ID Register
    MidrEl1,
    /// AArch32 Processor Feature Register 0
    IdPfr0El1,
    /// AArch32 Processor Feature Register 1
    IdPfr1El1,
    /// AArch32 Debug Feature Register 0
    IdDfr0El1,
    /// AArch32 Memory Model Feature Register 0
    IdMmfr0El1,
    /// AArch32 Memory Model Feature Register 1
    IdMmfr1El1,
    /// AArch32 Memory Model Feature Register 2
    IdMmfr2El1,
    /// AArch32 Memory Model Feature Register 3
    IdMmfr3El1,
    /// AArch32 Instruction Set Attribute Register 0
    IdIsar0El1,
    /// AArch32 Instruction Set Attribute Register 1
    IdIsar1El1,
    /// AArch32 Instruction Set Attribute Register 2
    IdIsar2El1,
    /// AArch32 Instruction Set Attribute Register 3
    IdIsar3El1,
    /// AArch32 Instruction Set Attribute Register 4
    IdIsar4El1,
    /// AArch32 Instruction Set Attribute Register 5
    IdIsar5El1,
    /// AArch32 Media and VFP Feature Register 0
    Mvfr0El1,
    /// AArch32 Media and VFP Feature Register 1
    Mvfr1El1,
    /// AArch32 Media and VFP Feature Register 2
    Mvfr2El1,
    /// AArch64 Processor Feature Register 0
    IdAa64Pfr0El1,
    /// AArch64 Processor Feature Register 1
    IdAa64Pfr1El1,
    /// AArch64 Debug Feature Register 0
    IdAa64Dfr0El1,
    /// AArch64 Debug Feature Register 1
    IdAa64Dfr1El1,
    /// AArch64 Memory Model Feature Register 0
    IdAa64Mmfr0El1,
    /// AArch64 Memory Model Feature Register 1
    IdAa64Mmfr1El1,
    /// AArch64 Memory Model Feature Register 2
    IdAa64Mmfr2El1,
    /// AArch64 Instruction Set Attribute Register 0
    IdAa64Isar0El1,
    /// AArch64 Instruction Set Attribute Register 1
    IdAa64Isar1El1,
    /// Cache Type Register
    CtrEl0,
    /// Data Cache Zero ID Register
    DczidEl0,
    /// Counter-timer Frequency Register
    CntfrqEl0,
}

impl SysReg {
    /// Architectural register name
    pub const fn name(self) -> &'static str {
        match self {
            Self::MidrEl1 => "MIDR_EL1",
            Self::IdPfr0El1 => "ID_PFR0_EL1",
            Self::IdPfr1El1 => "ID_PFR1_EL1",
            Self::IdDfr0El1 => "ID_DFR0_EL1",
            Self::IdMmfr0El1 => "ID_MMFR0_EL1",
            Self::IdMmfr1El1 => "ID_MMFR1_EL1",
            Self::IdMmfr2El1 => "ID_MMFR2_EL1",
            Self::IdMmfr3El1 => "ID_MMFR3_EL1",
            Self::IdIsar0El1 => "ID_ISAR0_EL1",
            Self::IdIsar1El1 => "ID_ISAR1_EL1",
            Self::IdIsar2El1 => "ID_ISAR2_EL1",
            Self::IdIsar3El1 => "ID_ISAR3_EL1",
            Self::IdIsar4El1 => "ID_ISAR4_EL1",
            Self::IdIsar5El1 => "ID_ISAR5_EL1",
            Self::Mvfr0El1 => "MVFR0_EL1",
            Self::Mvfr1El1 => "MVFR1_EL1",
            Self::Mvfr2El1 => "MVFR2_EL1",
            Self::IdAa64Pfr0El1 => "ID_AA64PFR0_EL1",
            Self::IdAa64Pfr1El1 => "ID_AA64PFR1_EL1",
            Self::IdAa64Dfr0El1 => "ID_AA64DFR0_EL1",
            Self::IdAa64Dfr1El1 => "ID_AA64DFR1_EL1",
            Self::IdAa64Mmfr0El1 => "ID_AA64MMFR0_EL1",
            Self::IdAa64Mmfr1El1 => "ID_AA64MMFR1_EL1",
            Self::IdAa64Mmfr2El1 => "ID_AA64MMFR2_EL1",
            Self::IdAa64Isar0El1 => "ID_AA64ISAR0_EL1",
            Self::IdAa64Isar1El1 => "ID_AA64ISAR1_EL1",
            Self::CtrEl0 => "CTR_EL0",
            Self::DczidEl0 => "DCZID_EL0",
            Self::CntfrqEl0 => "CNTFRQ_EL0",
        }
    }
}

impl fmt::Display for SysReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aarch32_register_names() {
        assert_eq!(SysReg::IdIsar5El1.to_string(), "ID_ISAR5_EL1");
        assert_eq!(SysReg::IdPfr1El1.name(), "ID_PFR1_EL1");
        assert_eq!(SysReg::Mvfr2El1.name(), "MVFR2_EL1");
    }
}
