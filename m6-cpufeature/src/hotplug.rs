//! Verification of CPUs that come up after boot
//!
//! Once the system-wide capability set is final, code may use any
//! capability in it without checking again. A CPU that joins later and
//! lacks one of them cannot be fixed up, so it is taken out of the system
//! and parked before it runs anything else.
//!
//! ```text
//! STARTING ──not finalised──────────────────► INTEGRATED
//! STARTING ──finalised──► VERIFYING ──ok────► INTEGRATED
//!                                   └─missing─► EJECTED (parked forever)
//! ```

use crate::descriptor::CpuCapability;
use crate::features::CpuFeatures;
use crate::platform::CpuOps;

/// Outcome of verifying a starting CPU that was allowed to continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The system capability set is not final yet, nothing was checked
    NotReady,
    /// The CPU has every re-verifiable system capability and has enabled them
    Verified,
}

impl CpuFeatures {
    /// Check that the calling CPU has every capability the system has
    /// committed to, and enable them on it.
    ///
    /// Must run on the starting CPU before it is made available to the
    /// scheduler. Registers are read through the raw reader, so no per-CPU
    /// state is needed.
    ///
    /// Enables run in two passes: first each capability's primary enable,
    /// in table order as it is verified, then a second pass with no
    /// descriptor so enables can take the other capabilities into account.
    ///
    /// Does not return if the CPU is missing a capability.
    pub fn verify_local_cpu_capabilities<P: CpuOps + ?Sized>(&self, cpus: &P) -> Verification {
        // Still in initial boot: the boot CPU decides what the system has
        if !self.is_finalised() {
            return Verification::NotReady;
        }

        for cap in self.table().entries() {
            if !self.has_cap(cap.capability) {
                continue;
            }
            let Some(reg) = cap.sys_reg else {
                continue;
            };

            if !cap.feature_matches(cpus.read_id_register(reg)) {
                fail_incapable_cpu(cpus, "cpu features", cap);
            }
            if let Some(enable) = cap.enable {
                enable(Some(cap));
            }
        }

        // Second pass lets enable() consider interacting capabilities
        for cap in self.table().entries() {
            if !self.has_cap(cap.capability) {
                continue;
            }
            if let Some(enable) = cap.enable {
                enable(None);
            }
        }

        log::trace!("CPU{}: capabilities verified", cpus.current_cpu());
        Verification::Verified
    }
}

/// Take the calling CPU out of the system for lacking `cap`.
///
/// Every step is best effort. The CPU ends up parked whether or not
/// firmware managed to power it down.
pub fn fail_incapable_cpu<P: CpuOps + ?Sized>(
    cpus: &P,
    cap_type: &str,
    cap: &CpuCapability,
) -> ! {
    let cpu = cpus.current_cpu();

    log::error!("CPU{}: missing {} : {}", cpu, cap_type, cap.desc);
    cpus.set_cpu_present(cpu, false);

    if cpus.cpu_die(cpu) {
        log::warn!("CPU{}: power down failed, parking", cpu);
    }
    cpus.park()
}
