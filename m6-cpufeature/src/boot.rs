//! Boot-time capability setup

use crate::features::CpuFeatures;
use crate::platform::CpuOps;

/// Label printed in front of each capability found at boot
pub const DETECTED_FEATURE: &str = "detected feature";

/// Compute the system-wide capability set on the boot CPU, freeze it, and
/// enable every capability found on all online CPUs.
///
/// Call exactly once, on the boot CPU, once every boot-time CPU is online.
///
/// # Panics
///
/// Panics if the capability table is malformed. That is a build mistake,
/// not something the system can run with.
pub fn setup_cpu_features<P: CpuOps>(features: &CpuFeatures, cpus: &P) {
    if let Err(err) = features.table().validate() {
        panic!("cpufeature: invalid capability table: {}", err);
    }

    features.check_cpu_capabilities(cpus, DETECTED_FEATURE);
    features.mark_finalised();
    features.enable_cpu_capabilities(cpus);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::descriptor::{CpuCapability, has_cpuid_feature};
    use crate::hotplug::Verification;
    use crate::sysreg::SysReg;
    use crate::testing::{EnableCall, Event, MockPlatform, Registers, enable_log, scenario_table};

    /// A present (field 24 = 1), B absent (field 20 = 0)
    fn boot_registers() -> Registers {
        Registers::new()
            .with(SysReg::IdAa64Pfr0El1, 0x0100_0000)
            .with(SysReg::IdAa64Mmfr1El1, 0)
    }

    #[test]
    fn test_boot_then_hotplug() {
        let features = CpuFeatures::new(scenario_table());
        let boot = MockPlatform::new(3, boot_registers());

        setup_cpu_features(&features, &boot);

        assert!(features.is_finalised());
        assert_eq!(features.caps().iter().collect::<Vec<_>>(), [Capability::HasSysregGicCpuif]);
        // e_A once per CPU from a single broadcast, e_B never
        assert_eq!(boot.broadcasts(), 1);
        assert_eq!(
            enable_log(),
            [
                EnableCall::primary(0, "A"),
                EnableCall::primary(1, "A"),
                EnableCall::primary(2, "A"),
            ]
        );

        // A capable CPU joins
        let joining = MockPlatform::new(4, boot_registers()).starting(3);
        assert_eq!(
            features.verify_local_cpu_capabilities(&joining),
            Verification::Verified
        );
        assert_eq!(
            enable_log(),
            [EnableCall::primary(3, "A"), EnableCall::refine(3, "A")]
        );
        assert!(joining.events().is_empty());

        // An incapable CPU joins
        let regs = Registers::new().with(SysReg::IdAa64Pfr0El1, 0);
        let joining = MockPlatform::new(4, regs).starting(3);
        assert!(joining.expect_park(|| {
            features.verify_local_cpu_capabilities(&joining);
        }));
        assert_eq!(
            joining.events(),
            [Event::MarkedAbsent(3), Event::CpuDie(3), Event::Parked(3)]
        );
        assert!(enable_log().is_empty());

        // Ejection leaves the system set alone
        assert_eq!(features.caps().iter().collect::<Vec<_>>(), [Capability::HasSysregGicCpuif]);
    }

    #[test]
    fn test_cpus_started_during_boot_are_not_verified() {
        let features = CpuFeatures::new(scenario_table());
        let secondary = MockPlatform::new(2, Registers::new()).starting(1);

        assert_eq!(
            features.verify_local_cpu_capabilities(&secondary),
            Verification::NotReady
        );
        assert_eq!(secondary.register_reads(), 0);
    }

    #[test]
    #[should_panic(expected = "invalid capability table")]
    fn test_invalid_table_is_fatal() {
        static DUPLICATED: [CpuCapability; 2] = [
            CpuCapability {
                desc: "first",
                capability: Capability::HasPan,
                matches: Some(has_cpuid_feature),
                sys_reg: Some(SysReg::IdAa64Mmfr1El1),
                field_pos: 20,
                min_field_value: 1,
                enable: None,
            },
            CpuCapability {
                desc: "second",
                capability: Capability::HasPan,
                matches: Some(has_cpuid_feature),
                sys_reg: Some(SysReg::IdAa64Mmfr1El1),
                field_pos: 20,
                min_field_value: 1,
                enable: None,
            },
        ];
        let features = CpuFeatures::new(&DUPLICATED);
        let platform = MockPlatform::new(1, Registers::new());

        setup_cpu_features(&features, &platform);
    }
}
