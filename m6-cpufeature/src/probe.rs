//! Capability probing
//!
//! Runs once on the boot CPU. Whatever the boot CPU reports is taken as
//! true for every CPU; CPUs that come up later are held to it by
//! [`verify_local_cpu_capabilities`](crate::CpuFeatures::verify_local_cpu_capabilities).

use crate::capability::CapabilitySet;
use crate::features::CpuFeatures;
use crate::platform::IdRegisterReader;

impl CpuFeatures {
    /// Run every matcher in table order against the calling CPU and record
    /// the capabilities it has.
    ///
    /// Prints `"{info} {desc}"` the first time each capability is found.
    /// Bits are only ever added, so probing again is harmless. Once the set
    /// is finalised it is read without locks and is never written again;
    /// probing then records nothing.
    ///
    /// Returns the capabilities this call added to the system-wide set.
    pub fn check_cpu_capabilities(
        &self,
        regs: &dyn IdRegisterReader,
        info: &str,
    ) -> CapabilitySet {
        let added = CapabilitySet::new();

        if self.is_finalised() {
            let late = self
                .table()
                .entries()
                .filter(|cap| !self.has_cap(cap.capability) && cap.matches(regs))
                .count();
            if late != 0 {
                log::warn!(
                    "cpufeature: ignoring {} capabilities found after finalisation",
                    late
                );
            }
            return added;
        }

        for cap in self.table().entries() {
            if !cap.matches(regs) {
                continue;
            }

            if self.caps().set(cap.capability) {
                log::info!("{} {}", info, cap.desc);
                added.set(cap.capability);
            }
        }

        added
    }
}
