//! arm64 bindings
//!
//! Implements the platform traits on real hardware through `m6-arch` and
//! holds the kernel's system-wide capability state.
//!
//! # Usage
//!
//! ```ignore
//! // BSP, after all boot-time secondaries are waiting on the barrier
//! m6_cpufeature::arch::setup_boot_cpu_features();
//!
//! // Every secondary, before it is handed to the scheduler
//! m6_cpufeature::arch::verify_secondary_cpu();
//! ```

use m6_arch::{cpu, psci, registers, smp};
use spin::Mutex;

use crate::boot;
use crate::capability::Capability;
use crate::descriptor::{CpuCapability, EnableFn};
use crate::features::CpuFeatures;
use crate::hotplug::Verification;
use crate::platform::{CpuOps, IdRegisterReader};
use crate::sysreg::SysReg;
use crate::table::ARM64_FEATURES;

/// The kernel's capability state
pub static SYSTEM_FEATURES: CpuFeatures = CpuFeatures::new(ARM64_FEATURES);

/// Enable being broadcast by [`Arm64Cpus::on_each_cpu`]
static PENDING_ENABLE: Mutex<Option<(EnableFn, &'static CpuCapability)>> = Mutex::new(None);

/// Platform services of the CPU this runs on
#[derive(Debug, Clone, Copy, Default)]
pub struct Arm64Cpus;

impl IdRegisterReader for Arm64Cpus {
    fn read_id_register(&self, reg: SysReg) -> u64 {
        match reg {
            SysReg::MidrEl1 => registers::read_midr_el1(),
            SysReg::IdPfr0El1 => registers::read_id_pfr0_el1(),
            SysReg::IdPfr1El1 => registers::read_id_pfr1_el1(),
            SysReg::IdDfr0El1 => registers::read_id_dfr0_el1(),
            SysReg::IdMmfr0El1 => registers::read_id_mmfr0_el1(),
            SysReg::IdMmfr1El1 => registers::read_id_mmfr1_el1(),
            SysReg::IdMmfr2El1 => registers::read_id_mmfr2_el1(),
            SysReg::IdMmfr3El1 => registers::read_id_mmfr3_el1(),
            SysReg::IdIsar0El1 => registers::read_id_isar0_el1(),
            SysReg::IdIsar1El1 => registers::read_id_isar1_el1(),
            SysReg::IdIsar2El1 => registers::read_id_isar2_el1(),
            SysReg::IdIsar3El1 => registers::read_id_isar3_el1(),
            SysReg::IdIsar4El1 => registers::read_id_isar4_el1(),
            SysReg::IdIsar5El1 => registers::read_id_isar5_el1(),
            SysReg::Mvfr0El1 => registers::read_mvfr0_el1(),
            SysReg::Mvfr1El1 => registers::read_mvfr1_el1(),
            SysReg::Mvfr2El1 => registers::read_mvfr2_el1(),
            SysReg::IdAa64Pfr0El1 => registers::read_id_aa64pfr0_el1(),
            SysReg::IdAa64Pfr1El1 => registers::read_id_aa64pfr1_el1(),
            SysReg::IdAa64Dfr0El1 => registers::read_id_aa64dfr0_el1(),
            SysReg::IdAa64Dfr1El1 => registers::read_id_aa64dfr1_el1(),
            SysReg::IdAa64Mmfr0El1 => registers::read_id_aa64mmfr0_el1(),
            SysReg::IdAa64Mmfr1El1 => registers::read_id_aa64mmfr1_el1(),
            SysReg::IdAa64Mmfr2El1 => registers::read_id_aa64mmfr2_el1(),
            SysReg::IdAa64Isar0El1 => registers::read_id_aa64isar0_el1(),
            SysReg::IdAa64Isar1El1 => registers::read_id_aa64isar1_el1(),
            SysReg::CtrEl0 => registers::read_ctr_el0(),
            SysReg::DczidEl0 => registers::read_dczid_el0(),
            SysReg::CntfrqEl0 => registers::read_cntfrq_el0(),
        }
    }
}

/// Cross-call target: run the pending enable on this CPU
fn run_pending_enable(_arg: usize) {
    let pending = *PENDING_ENABLE.lock();
    if let Some((enable, cap)) = pending {
        enable(Some(cap));
    }
}

impl CpuOps for Arm64Cpus {
    fn current_cpu(&self) -> usize {
        cpu::cpu_id()
    }

    fn on_each_cpu(&self, enable: EnableFn, cap: &'static CpuCapability) {
        *PENDING_ENABLE.lock() = Some((enable, cap));
        smp::run_on_each_cpu(run_pending_enable, 0);
        *PENDING_ENABLE.lock() = None;
    }

    fn set_cpu_present(&self, cpu: usize, present: bool) {
        smp::set_cpu_present(cpu, present);
    }

    fn cpu_die(&self, _cpu: usize) -> bool {
        // Without configured firmware an HVC/SMC would trap before parking
        if !psci::is_configured() {
            return false;
        }
        // SAFETY: the CPU is being ejected; it holds no locks and nothing
        // else depends on it
        if let Err(err) = unsafe { psci::cpu_off() } {
            log::warn!("PSCI CPU_OFF failed: {:?}", err);
        }
        true
    }

    fn park(&self) -> ! {
        cpu::park()
    }
}

/// Probe, freeze and enable the system capabilities. BSP only, once.
pub fn setup_boot_cpu_features() {
    boot::setup_cpu_features(&SYSTEM_FEATURES, &Arm64Cpus);
}

/// Hold a starting secondary CPU to the system capabilities.
///
/// Does not return if the CPU is missing one.
pub fn verify_secondary_cpu() -> Verification {
    SYSTEM_FEATURES.verify_local_cpu_capabilities(&Arm64Cpus)
}

/// Check whether every CPU in the system has `cap`
#[inline]
pub fn cpus_have_cap(cap: Capability) -> bool {
    SYSTEM_FEATURES.has_cap(cap)
}

/// Check whether the calling CPU has `cap`
pub fn this_cpu_has_cap(cap: Capability) -> bool {
    SYSTEM_FEATURES.this_cpu_has_cap(cap, &Arm64Cpus)
}
