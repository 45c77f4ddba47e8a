//! PSCI (Power State Coordination Interface) calls
//!
//! Only the calls needed to take a CPU down are provided here. The conduit
//! (SMC vs HVC) is chosen once by platform code via [`set_conduit`]. Until
//! then PSCI is treated as absent and no call is issued: an HVC or SMC with
//! nothing behind it is an undefined instruction.
//!
//! Reference: ARM DEN0022D - Power State Coordination Interface

use core::arch::asm;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Get PSCI version
const PSCI_VERSION: u32 = 0x8400_0000;

/// CPU_OFF - Power down the calling CPU
const CPU_OFF: u32 = 0x8400_0002;

/// How PSCI calls reach firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Conduit {
    /// Hypervisor Call, serviced at EL2 (QEMU, KVM guests)
    Hvc = 0,
    /// Secure Monitor Call, serviced at EL3 (TF-A)
    Smc = 1,
}

static CONDUIT: AtomicU8 = AtomicU8::new(Conduit::Hvc as u8);

/// Set once platform code has found PSCI firmware
static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// PSCI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PsciError {
    /// Operation not supported
    NotSupported = -1,
    /// Invalid parameters
    InvalidParameters = -2,
    /// Operation denied
    Denied = -3,
    /// Internal failure
    InternalFailure = -6,
}

impl PsciError {
    fn from_i64(value: i64) -> Self {
        match value as i32 {
            -1 => Self::NotSupported,
            -2 => Self::InvalidParameters,
            -3 => Self::Denied,
            _ => Self::InternalFailure,
        }
    }
}

/// Select the conduit for all later PSCI calls.
///
/// Only call this once firmware has been found behind `conduit`.
pub fn set_conduit(conduit: Conduit) {
    CONDUIT.store(conduit as u8, Ordering::Relaxed);
    CONFIGURED.store(true, Ordering::Release);
}

/// Check whether platform code has configured a PSCI conduit
#[inline]
pub fn is_configured() -> bool {
    CONFIGURED.load(Ordering::Acquire)
}

/// Issue a PSCI call through the configured conduit.
///
/// # Safety
/// The caller must ensure the function ID and arguments are valid.
#[inline]
unsafe fn psci_call(func: u32, arg0: u64) -> i64 {
    let result: i64;
    if CONDUIT.load(Ordering::Relaxed) == Conduit::Smc as u8 {
        unsafe {
            asm!(
                "smc #0",
                inout("x0") func as u64 => result,
                inout("x1") arg0 => _,
                out("x2") _,
                out("x3") _,
                options(nomem, nostack)
            );
        }
    } else {
        unsafe {
            asm!(
                "hvc #0",
                inout("x0") func as u64 => result,
                inout("x1") arg0 => _,
                out("x2") _,
                out("x3") _,
                options(nomem, nostack)
            );
        }
    }
    result
}

/// Get the PSCI version supported by firmware as (major, minor).
pub fn version() -> (u16, u16) {
    // SAFETY: PSCI_VERSION is always safe to call
    let v = unsafe { psci_call(PSCI_VERSION, 0) };
    (((v >> 16) & 0xFFFF) as u16, (v & 0xFFFF) as u16)
}

/// Power down the calling CPU.
///
/// Does not return on success.
///
/// # Safety
/// The CPU must hold no locks and must not be needed by anything else.
pub unsafe fn cpu_off() -> Result<(), PsciError> {
    // SAFETY: caller guarantees the CPU is ready to power down
    let result = unsafe { psci_call(CPU_OFF, 0) };

    // If we get here, it failed (success doesn't return)
    Err(PsciError::from_i64(result))
}

/// Check if PSCI is available and working.
///
/// Issues no call unless a conduit has been configured.
pub fn is_available() -> bool {
    is_configured() && version().0 > 0
}
