//! System readiness flag
//!
//! Set once the boot CPU has finished computing the system-wide capability
//! set. The release store pairs with the acquire load so that a CPU which
//! sees the flag also sees every capability bit written before it.

use core::sync::atomic::{AtomicBool, Ordering};

/// One-way flag marking the capability set as final
#[derive(Debug)]
pub struct SystemReadiness(AtomicBool);

impl SystemReadiness {
    /// A flag that is not yet set
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark the capability set final. There is no way to undo this.
    #[inline]
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check whether the capability set is final
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for SystemReadiness {
    fn default() -> Self {
        Self::new()
    }
}
