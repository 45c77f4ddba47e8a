//! # m6-cpufeature
//!
//! CPU capability detection and enforcement for the M6 kernel.
//!
//! Some CPU features, such as Privileged Access Never or the GICv3 system
//! register interface, may only be relied on once every CPU is known to
//! have them. This crate decides which features the system has and keeps
//! every CPU that joins later to that decision.
//!
//! # Overview
//!
//! - A [`CapabilityTable`] lists [`CpuCapability`] descriptors: which ID
//!   register field to read, the minimum value, and an optional enable
//!   function.
//! - At boot, [`setup_cpu_features`] probes the boot CPU, records what it
//!   has in the [`CpuFeatures`] capability set, freezes that set, and runs
//!   each enable function on every online CPU.
//! - Each CPU that starts afterwards calls
//!   [`CpuFeatures::verify_local_cpu_capabilities`]. A CPU that lacks a
//!   committed capability is marked absent and parked for good.
//!
//! # Kernel Integration
//!
//! The engine reaches hardware only through the [`IdRegisterReader`] and
//! [`CpuOps`] traits. On arm64 the `arch` module implements them with
//! `m6-arch` and owns the kernel's [`CpuFeatures`] instance.
//!
//! # Configuration
//!
//! | Feature | Capability |
//! |---------|------------|
//! | `pan` | Privileged Access Never |
//! | `lse` | LSE atomic instructions |
//! | `uao` | User Access Override |
//!
//! All are on by default. The GIC system register interface is always
//! described.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

mod boot;
mod capability;
mod descriptor;
mod enable;
mod error;
mod features;
mod field;
mod hotplug;
mod platform;
mod probe;
mod readiness;
mod sysreg;
mod table;

#[cfg(target_arch = "aarch64")]
pub mod arch;

#[cfg(test)]
mod testing;

pub use boot::{DETECTED_FEATURE, setup_cpu_features};
pub use capability::{Capability, CapabilitySet, NCAPS};
pub use descriptor::{
    CpuCapability, EnableFn, MatchFn, has_cpuid_feature, has_id_aa64mmfr1_feature,
    has_id_aa64pfr0_feature,
};
pub use error::{CpuFeatureError, CpuFeatureResult};
pub use features::CpuFeatures;
pub use field::{FIELD_WIDTH, extract_signed_field, extract_unsigned_field, field_at_least};
pub use hotplug::{Verification, fail_incapable_cpu};
pub use platform::{CpuOps, IdRegisterReader};
pub use readiness::SystemReadiness;
pub use sysreg::SysReg;
pub use table::{ARM64_FEATURES, CapabilityTable};
