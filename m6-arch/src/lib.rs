//! # m6-arch
//!
//! ARM64 architecture support for the M6 kernel.
//!
//! Provides the low-level CPU operations used while bringing CPUs up:
//! - [`cpu`]: CPU identification, low-power waits, PSTATE feature control
//! - [`registers`]: Raw identification register reads
//! - [`smp`]: Online/present tracking, startup barrier, cross-calls
//! - [`crosscall`]: Generation-tagged cross-call bookkeeping
//! - [`psci`]: Firmware power management (CPU_OFF)
//!
//! # Safety
//!
//! This crate contains extensive `unsafe` code for hardware access.
//! All unsafe operations are documented with `// SAFETY:` comments
//! explaining the invariants that must be maintained.
//!
//! Only [`crosscall`] is built on other targets, so its logic can be
//! tested on the host.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod crosscall;

#[cfg(target_arch = "aarch64")]
pub mod cpu;
#[cfg(target_arch = "aarch64")]
pub mod psci;
#[cfg(target_arch = "aarch64")]
pub mod registers;
#[cfg(target_arch = "aarch64")]
pub mod smp;

#[cfg(target_arch = "aarch64")]
pub use cpu::{park, wait_for_interrupt};
