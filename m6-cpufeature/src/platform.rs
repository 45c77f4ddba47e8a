//! Trait definitions for the hardware services the engine relies on
//!
//! The engine itself never touches hardware. The kernel implements these
//! traits on top of `m6-arch` (see the `arch` module); tests implement them
//! over synthetic register files.

use crate::descriptor::{CpuCapability, EnableFn};
use crate::sysreg::SysReg;

/// Raw identification register access.
///
/// Implementations must not depend on any per-CPU bookkeeping: the reader
/// is used on CPUs that are still starting up.
pub trait IdRegisterReader {
    /// Read `reg` on the calling CPU
    fn read_id_register(&self, reg: SysReg) -> u64;
}

/// Per-CPU services needed to enable capabilities and to eject CPUs
pub trait CpuOps: IdRegisterReader {
    /// Logical id of the calling CPU
    fn current_cpu(&self) -> usize;

    /// Run `enable(Some(cap))` on every online CPU, including the caller.
    ///
    /// Must not return until every CPU has finished the call.
    fn on_each_cpu(&self, enable: EnableFn, cap: &'static CpuCapability);

    /// Update whether the scheduler may consider `cpu`.
    ///
    /// Marking a CPU absent is irreversible.
    fn set_cpu_present(&self, cpu: usize, present: bool);

    /// Ask firmware to power `cpu` down.
    ///
    /// A successful power-down does not return. Returns `true` if an
    /// attempt was made and failed, `false` if the platform has no way to
    /// power CPUs down.
    fn cpu_die(&self, cpu: usize) -> bool;

    /// Stop the calling CPU for good
    fn park(&self) -> !;
}
