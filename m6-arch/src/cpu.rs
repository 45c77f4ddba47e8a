//! CPU Control
//!
//! Low-level per-CPU operations used during bring-up: identification,
//! low-power waits, and PSTATE control for access-protection features.

use aarch64_cpu::registers::{MPIDR_EL1, SCTLR_EL1};
use core::arch::asm;
use tock_registers::interfaces::{Readable, Writeable};

/// SCTLR_EL1.SPAN: when clear, PSTATE.PAN is set on exception entry to EL1
const SCTLR_EL1_SPAN: u64 = 1 << 23;

/// `msr pan, #1`, emitted as a raw encoding so the assembler does not need
/// the ARMv8.1 target feature.
const SET_PSTATE_PAN: u32 = 0xd500_419f;

/// `msr uao, #1` (ARMv8.2), raw encoding for the same reason.
const SET_PSTATE_UAO: u32 = 0xd500_417f;

/// Get the current CPU ID (MPIDR_EL1 Aff0 field)
#[must_use]
pub fn cpu_id() -> usize {
    (MPIDR_EL1.get() & 0xFF) as usize
}

/// Park the calling CPU for good.
///
/// Alternates WFE and WFI so that neither a stray event nor an interrupt
/// lets the CPU run anything else. Used for CPUs that have been removed
/// from the system.
pub fn park() -> ! {
    loop {
        wait_for_event();
        wait_for_interrupt();
    }
}

/// Wait for interrupt (WFI instruction)
#[inline]
pub fn wait_for_interrupt() {
    // SAFETY: WFI is always safe to call
    unsafe {
        asm!("wfi", options(nomem, nostack));
    }
}

/// Wait for event (WFE instruction)
#[inline]
pub fn wait_for_event() {
    // SAFETY: WFE is always safe to call
    unsafe {
        asm!("wfe", options(nomem, nostack));
    }
}

/// Send event (SEV instruction)
#[inline]
pub fn send_event() {
    // SAFETY: SEV is always safe to call
    unsafe {
        asm!("sev", options(nomem, nostack));
    }
}

/// Instruction synchronization barrier
#[inline]
pub fn isb() {
    // SAFETY: ISB is always safe
    unsafe {
        asm!("isb", options(nostack));
    }
}

/// Turn on Privileged Access Never for this CPU.
///
/// Clears SCTLR_EL1.SPAN so PAN is re-asserted on every exception taken
/// to EL1, then sets PSTATE.PAN for the current context.
///
/// The caller must have established that this CPU implements PAN.
pub fn enable_pan() {
    SCTLR_EL1.set(SCTLR_EL1.get() & !SCTLR_EL1_SPAN);
    isb();
    // SAFETY: only reached on CPUs that advertise PAN in ID_AA64MMFR1_EL1
    unsafe {
        asm!(".inst {insn}", insn = const SET_PSTATE_PAN, options(nomem, nostack));
    }
}

/// Turn on User Access Override for this CPU.
///
/// The caller must have established that this CPU implements UAO.
pub fn enable_uao() {
    // SAFETY: only reached on CPUs that advertise UAO in ID_AA64MMFR2_EL1
    unsafe {
        asm!(".inst {insn}", insn = const SET_PSTATE_UAO, options(nomem, nostack));
    }
}
