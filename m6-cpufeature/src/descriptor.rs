//! Capability descriptors
//!
//! A [`CpuCapability`] says how to detect one capability and, optionally,
//! how to turn it on for the current CPU. Descriptors are compiled in and
//! never change.

use crate::capability::Capability;
use crate::field;
use crate::platform::IdRegisterReader;
use crate::sysreg::SysReg;

/// Decide whether the calling CPU has the capability described by `cap`
pub type MatchFn = fn(cap: &CpuCapability, regs: &dyn IdRegisterReader) -> bool;

/// Turn a capability on for the calling CPU.
///
/// Called with `Some(cap)` for the primary enable and with `None` for the
/// follow-up pass run on hotplugged CPUs once every primary enable is done.
/// Enable functions must not fail.
pub type EnableFn = fn(cap: Option<&CpuCapability>);

/// Static description of one capability
#[derive(Debug, Clone, Copy)]
pub struct CpuCapability {
    /// Human-readable name, used in diagnostics
    pub desc: &'static str,
    /// Bit in the system-wide capability set
    pub capability: Capability,
    /// Detection function; `None` only for [`CpuCapability::END`]
    pub matches: Option<MatchFn>,
    /// Register a starting CPU re-reads to confirm it has the capability.
    ///
    /// `None` means the capability can only be checked at boot and is not
    /// verified on hotplugged CPUs.
    pub sys_reg: Option<SysReg>,
    /// Bit position of the field inside the register
    pub field_pos: u32,
    /// Smallest signed field value that counts as present
    pub min_field_value: i64,
    /// Enable function, if the capability needs one
    pub enable: Option<EnableFn>,
}

impl CpuCapability {
    /// The end-of-table marker
    pub const END: CpuCapability = CpuCapability {
        desc: "",
        capability: Capability::HasSysregGicCpuif,
        matches: None,
        sys_reg: None,
        field_pos: 0,
        min_field_value: 0,
        enable: None,
    };

    /// Check whether this is the end-of-table marker
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.matches.is_none() && self.desc.is_empty()
    }

    /// Run the matcher against the calling CPU
    #[must_use]
    pub fn matches(&self, regs: &dyn IdRegisterReader) -> bool {
        self.matches.is_some_and(|matches| matches(self, regs))
    }

    /// Check a register value against this descriptor's field and minimum
    #[inline]
    #[must_use]
    pub fn feature_matches(&self, reg: u64) -> bool {
        field::field_at_least(reg, self.field_pos, self.min_field_value)
    }
}

/// Matcher for descriptors whose field lives in `sys_reg`.
///
/// A descriptor without a register never matches.
pub fn has_cpuid_feature(cap: &CpuCapability, regs: &dyn IdRegisterReader) -> bool {
    match cap.sys_reg {
        Some(reg) => cap.feature_matches(regs.read_id_register(reg)),
        None => false,
    }
}

/// Matcher that always reads ID_AA64PFR0_EL1, whatever `sys_reg` says
pub fn has_id_aa64pfr0_feature(cap: &CpuCapability, regs: &dyn IdRegisterReader) -> bool {
    cap.feature_matches(regs.read_id_register(SysReg::IdAa64Pfr0El1))
}

/// Matcher that always reads ID_AA64MMFR1_EL1, whatever `sys_reg` says
pub fn has_id_aa64mmfr1_feature(cap: &CpuCapability, regs: &dyn IdRegisterReader) -> bool {
    cap.feature_matches(regs.read_id_register(SysReg::IdAa64Mmfr1El1))
}
