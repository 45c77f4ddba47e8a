//! Capability enablement at boot

use crate::features::CpuFeatures;
use crate::platform::CpuOps;

impl CpuFeatures {
    /// Run the enable function of every capability the system has on every
    /// online CPU.
    ///
    /// Descriptors are handled in table order and each broadcast completes
    /// on all CPUs before the next one starts. Called once, on the boot
    /// CPU, after all boot-time CPUs are online.
    pub fn enable_cpu_capabilities<P: CpuOps + ?Sized>(&self, cpus: &P) {
        for cap in self.table().entries() {
            let Some(enable) = cap.enable else {
                continue;
            };
            if !self.has_cap(cap.capability) {
                continue;
            }

            log::debug!("cpufeature: enabling {} on all CPUs", cap.desc);
            cpus.on_each_cpu(enable, cap);
        }
    }
}
