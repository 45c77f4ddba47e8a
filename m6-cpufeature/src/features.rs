//! The system-wide capability state
//!
//! [`CpuFeatures`] ties a descriptor table to the capability set computed
//! from it and to the readiness flag. The kernel keeps one in a `static`;
//! tests build their own.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──probe──► bits set ──finalise──► ready ──► enable / verify
//! ```
//!
//! Capability bits are only written before the readiness flag is set.
//! After that the set is read-only and may be read from any CPU without
//! locking.

use crate::capability::{Capability, CapabilitySet};
use crate::descriptor::CpuCapability;
use crate::platform::IdRegisterReader;
use crate::readiness::SystemReadiness;
use crate::table::CapabilityTable;

/// Capability table plus the system-wide state derived from it
#[derive(Debug)]
pub struct CpuFeatures {
    table: CapabilityTable,
    caps: CapabilitySet,
    ready: SystemReadiness,
}

impl CpuFeatures {
    /// Fresh state for `table`: no capabilities, not finalised
    #[must_use]
    pub const fn new(table: &'static [CpuCapability]) -> Self {
        Self {
            table: CapabilityTable::new(table),
            caps: CapabilitySet::new(),
            ready: SystemReadiness::new(),
        }
    }

    /// The descriptor table
    #[inline]
    #[must_use]
    pub fn table(&self) -> CapabilityTable {
        self.table
    }

    /// The system-wide capability set
    #[inline]
    #[must_use]
    pub fn caps(&self) -> &CapabilitySet {
        &self.caps
    }

    /// Check whether the system as a whole has `cap`
    #[inline]
    #[must_use]
    pub fn has_cap(&self, cap: Capability) -> bool {
        self.caps.has(cap)
    }

    /// Check whether the calling CPU has `cap`, regardless of the system
    /// state. Returns `false` for capabilities the table does not describe.
    #[must_use]
    pub fn this_cpu_has_cap(&self, cap: Capability, regs: &dyn IdRegisterReader) -> bool {
        self.table
            .find(cap)
            .is_some_and(|entry| entry.matches(regs))
    }

    /// Descriptors of the capabilities the system has
    pub fn detected(&self) -> impl Iterator<Item = &'static CpuCapability> + '_ {
        self.table
            .entries()
            .filter(|entry| self.caps.has(entry.capability))
    }

    /// Check whether the system-wide capability set is final
    #[inline]
    #[must_use]
    pub fn is_finalised(&self) -> bool {
        self.ready.is_set()
    }

    /// Freeze the system-wide capability set.
    ///
    /// Must be called after the last probe and before any CPU is brought up
    /// that should be verified.
    pub fn mark_finalised(&self) {
        log::debug!(
            "cpufeature: system capabilities finalised ({:#x})",
            self.caps.bits()
        );
        self.ready.set();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::has_cpuid_feature;
    use crate::sysreg::SysReg;
    use crate::testing::Registers;

    static TABLE: [CpuCapability; 2] = [
        CpuCapability {
            desc: "GIC system register CPU interface",
            capability: Capability::HasSysregGicCpuif,
            matches: Some(has_cpuid_feature),
            sys_reg: Some(SysReg::IdAa64Pfr0El1),
            field_pos: 24,
            min_field_value: 1,
            enable: None,
        },
        CpuCapability {
            desc: "Privileged Access Never",
            capability: Capability::HasPan,
            matches: Some(has_cpuid_feature),
            sys_reg: Some(SysReg::IdAa64Mmfr1El1),
            field_pos: 20,
            min_field_value: 1,
            enable: None,
        },
    ];

    #[test]
    fn test_new_state_is_empty() {
        let features = CpuFeatures::new(&TABLE);
        assert!(!features.is_finalised());
        assert!(features.caps().is_empty());
        assert_eq!(features.detected().count(), 0);
    }

    #[test]
    fn test_finalise_is_one_way() {
        let features = CpuFeatures::new(&TABLE);
        features.mark_finalised();
        assert!(features.is_finalised());
        features.mark_finalised();
        assert!(features.is_finalised());
    }

    #[test]
    fn test_detected_follows_table_order() {
        let features = CpuFeatures::new(&TABLE);
        features.caps().set(Capability::HasPan);
        features.caps().set(Capability::HasSysregGicCpuif);
        let names: Vec<_> = features.detected().map(|cap| cap.desc).collect();
        assert_eq!(
            names,
            ["GIC system register CPU interface", "Privileged Access Never"]
        );
    }

    #[test]
    fn test_this_cpu_has_cap() {
        let features = CpuFeatures::new(&TABLE);
        let regs = Registers::new().with(SysReg::IdAa64Mmfr1El1, 0x0010_0000);
        assert!(features.this_cpu_has_cap(Capability::HasPan, &regs));
        assert!(!features.this_cpu_has_cap(Capability::HasSysregGicCpuif, &regs));
        // Not in the table at all
        assert!(!features.this_cpu_has_cap(Capability::HasUao, &regs));
        // Local checks never touch the system-wide set
        assert!(features.caps().is_empty());
    }
}
