//! SMP (Symmetric Multi-Processing) Support
//!
//! Tracks which CPUs are online and present, provides the startup barrier,
//! and a blocking cross-call that runs a function on every online CPU.
//!
//! Secondary CPUs service cross-calls while they wait on the barrier and
//! whenever they call [`service_cross_calls`] from their idle loop.

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use spin::Mutex;

use crate::cpu::{cpu_id, send_event, wait_for_event};
use crate::crosscall::{CrossCall, Mailbox};

/// Maximum number of CPUs supported
pub const MAX_CPUS: usize = 8;

/// Number of CPUs that have completed initialisation
static CPUS_ONLINE: AtomicU32 = AtomicU32::new(1); // BSP (CPU 0) is online from start

/// Bitmask of CPUs the scheduler may consider. Cleared bits never come back.
static CPUS_PRESENT: AtomicU64 = AtomicU64::new(u64::MAX >> (64 - MAX_CPUS));

/// Barrier for CPU synchronisation during startup
static CPU_BARRIER: AtomicU32 = AtomicU32::new(0);

/// Serialises callers of [`run_on_each_cpu`]
static CROSS_CALL_LOCK: Mutex<()> = Mutex::new(());

/// Pending cross-call and per-CPU completion. CPU 0 (BSP) is a member from start.
static CROSS_CALLS: Mailbox<MAX_CPUS> = Mailbox::new(1);

/// Get the number of CPUs currently online.
#[inline]
pub fn cpus_online() -> u32 {
    CPUS_ONLINE.load(Ordering::Acquire)
}

/// Increment the online CPU count.
///
/// Called by secondary CPUs when they complete basic initialisation.
/// Cross-calls posted before this point are not run on the new CPU.
#[inline]
pub fn mark_cpu_online() {
    CROSS_CALLS.join(cpu_id());
    CPUS_ONLINE.fetch_add(1, Ordering::SeqCst);
}

/// Check whether a CPU is still present.
#[inline]
pub fn cpu_present(cpu: usize) -> bool {
    cpu < MAX_CPUS && CPUS_PRESENT.load(Ordering::Acquire) & (1 << cpu) != 0
}

/// Mark a CPU present or absent.
///
/// Marking a CPU absent is permanent: later attempts to mark it present
/// are ignored.
pub fn set_cpu_present(cpu: usize, present: bool) {
    if cpu >= MAX_CPUS || present {
        return;
    }
    CPUS_PRESENT.fetch_and(!(1 << cpu), Ordering::AcqRel);
}

/// Wait for the barrier to reach the expected value.
///
/// Uses WFE (Wait For Event) to avoid busy-spinning. Cross-calls issued
/// by the BSP while we wait are executed here.
pub fn wait_for_barrier(expected: u32) {
    while CPU_BARRIER.load(Ordering::Acquire) < expected {
        service_cross_calls();
        // Use WFE to wait for an event (SEV from BSP)
        wait_for_event();
    }
}

/// Release CPUs waiting on the barrier.
///
/// Called by BSP to signal secondary CPUs to proceed.
pub fn release_barrier(value: u32) {
    CPU_BARRIER.store(value, Ordering::Release);
    // Send event to wake all CPUs waiting on WFE
    send_event();
}

/// Run `func(arg)` on every online CPU, including the caller, and return
/// once all of them have finished.
///
/// CPUs marked absent while the call is in flight are not waited for.
pub fn run_on_each_cpu(func: fn(usize), arg: usize) {
    let _serialise = CROSS_CALL_LOCK.lock();

    let call = CrossCall { func, arg };
    let ticket = CROSS_CALLS.post(cpu_id(), call);
    send_event();

    call.run();

    while !CROSS_CALLS.is_complete(&ticket, cpu_present) {
        wait_for_event();
    }
}

/// Execute the pending cross-call on this CPU if it has not run it yet.
pub fn service_cross_calls() {
    let cpu = cpu_id();
    if let Some((generation, call)) = CROSS_CALLS.take(cpu) {
        call.run();
        CROSS_CALLS.complete(cpu, generation);
        send_event();
    }
}
