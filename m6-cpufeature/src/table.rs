//! Capability tables
//!
//! A table is a `'static` slice of descriptors. [`CpuCapability::END`] may be
//! used to terminate it early; every walk over a table goes through
//! [`CapabilityTable::entries`], which stops at the first end marker or at
//! the end of the slice.

use crate::capability::{Capability, NCAPS};
use crate::descriptor::{CpuCapability, has_cpuid_feature};
use crate::error::{CpuFeatureError, CpuFeatureResult};
use crate::field::FIELD_WIDTH;
use crate::sysreg::SysReg;

/// An ordered, immutable list of capability descriptors
#[derive(Debug, Clone, Copy)]
pub struct CapabilityTable {
    caps: &'static [CpuCapability],
}

impl CapabilityTable {
    /// Wrap a descriptor slice
    #[must_use]
    pub const fn new(caps: &'static [CpuCapability]) -> Self {
        Self { caps }
    }

    /// Descriptors in declaration order, up to the end marker
    pub fn entries(self) -> impl Iterator<Item = &'static CpuCapability> {
        self.caps.iter().take_while(|cap| !cap.is_end())
    }

    /// Look up the descriptor for a capability
    #[must_use]
    pub fn find(&self, cap: Capability) -> Option<&'static CpuCapability> {
        self.entries().find(|entry| entry.capability == cap)
    }

    /// Number of descriptors before the end marker
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Check whether the table describes no capability
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Check the table for construction mistakes.
    ///
    /// Each capability id may appear once, every descriptor needs a name and
    /// a matcher, and every field has to start inside the register.
    pub fn validate(&self) -> CpuFeatureResult<()> {
        let mut seen = [false; NCAPS];

        for (index, cap) in self.caps.iter().enumerate() {
            if cap.is_end() {
                break;
            }
            if cap.desc.is_empty() {
                return Err(CpuFeatureError::MissingDescription(index));
            }
            if cap.matches.is_none() {
                return Err(CpuFeatureError::MissingMatcher(index));
            }
            if cap.field_pos > u64::BITS - FIELD_WIDTH {
                return Err(CpuFeatureError::FieldOutOfRange {
                    index,
                    field_pos: cap.field_pos,
                });
            }

            let slot = &mut seen[cap.capability.bit() as usize];
            if *slot {
                return Err(CpuFeatureError::DuplicateCapability(cap.capability));
            }
            *slot = true;
        }

        Ok(())
    }
}

#[cfg(all(target_arch = "aarch64", feature = "pan"))]
fn cpu_enable_pan(_cap: Option<&CpuCapability>) {
    m6_arch::cpu::enable_pan();
}

#[cfg(all(not(target_arch = "aarch64"), feature = "pan"))]
fn cpu_enable_pan(_cap: Option<&CpuCapability>) {}

#[cfg(all(target_arch = "aarch64", feature = "uao"))]
fn cpu_enable_uao(_cap: Option<&CpuCapability>) {
    m6_arch::cpu::enable_uao();
}

#[cfg(all(not(target_arch = "aarch64"), feature = "uao"))]
fn cpu_enable_uao(_cap: Option<&CpuCapability>) {}

/// Capabilities the M6 kernel knows how to detect on arm64
pub static ARM64_FEATURES: &[CpuCapability] = &[
    CpuCapability {
        desc: "GIC system register CPU interface",
        capability: Capability::HasSysregGicCpuif,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Pfr0El1),
        field_pos: 24,
        min_field_value: 1,
        enable: None,
    },
    #[cfg(feature = "pan")]
    CpuCapability {
        desc: "Privileged Access Never",
        capability: Capability::HasPan,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Mmfr1El1),
        field_pos: 20,
        min_field_value: 1,
        enable: Some(cpu_enable_pan),
    },
    #[cfg(feature = "lse")]
    CpuCapability {
        desc: "LSE atomic instructions",
        capability: Capability::HasLseAtomics,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Isar0El1),
        field_pos: 20,
        min_field_value: 2,
        enable: None,
    },
    #[cfg(feature = "uao")]
    CpuCapability {
        desc: "User Access Override",
        capability: Capability::HasUao,
        matches: Some(has_cpuid_feature),
        sys_reg: Some(SysReg::IdAa64Mmfr2El1),
        field_pos: 4,
        min_field_value: 1,
        enable: Some(cpu_enable_uao),
    },
    CpuCapability::END,
];
