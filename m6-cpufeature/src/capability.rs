//! Capability identifiers and the system-wide capability bitmap

use core::sync::atomic::{AtomicU64, Ordering};

/// An optional CPU feature the kernel may come to rely on.
///
/// The discriminant is the capability's bit in a [`CapabilitySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Capability {
    /// GICv3 CPU interface accessible through system registers
    HasSysregGicCpuif = 0,
    /// Privileged Access Never
    HasPan = 1,
    /// Large System Extensions atomic instructions
    HasLseAtomics = 2,
    /// User Access Override
    HasUao = 3,
}

/// Number of capability ids
pub const NCAPS: usize = 4;

const _: () = assert!(NCAPS <= u64::BITS as usize);

impl Capability {
    /// Every capability, in bit order
    pub const ALL: [Capability; NCAPS] = [
        Capability::HasSysregGicCpuif,
        Capability::HasPan,
        Capability::HasLseAtomics,
        Capability::HasUao,
    ];

    /// Bit index in a [`CapabilitySet`]
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u32 {
        self as u32
    }

    #[inline]
    const fn mask(self) -> u64 {
        1 << self.bit()
    }
}

/// A set of capabilities that can only grow.
///
/// Bits are set with atomic OR and there is no way to clear one, so any
/// capability observed as present stays present for the life of the set.
#[derive(Debug)]
pub struct CapabilitySet {
    bits: AtomicU64,
}

impl CapabilitySet {
    /// An empty set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: AtomicU64::new(0),
        }
    }

    /// Add a capability. Adding one that is already present is a no-op.
    ///
    /// Returns `true` if the capability was not present before.
    #[inline]
    pub(crate) fn set(&self, cap: Capability) -> bool {
        self.bits.fetch_or(cap.mask(), Ordering::Relaxed) & cap.mask() == 0
    }

    /// Check whether a capability is present
    #[inline]
    #[must_use]
    pub fn has(&self, cap: Capability) -> bool {
        self.bits.load(Ordering::Relaxed) & cap.mask() != 0
    }

    /// Raw bitmap, one bit per [`Capability`]
    #[inline]
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.bits.load(Ordering::Relaxed)
    }

    /// Check whether no capability is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits() == 0
    }

    /// Number of capabilities present
    #[must_use]
    pub fn count(&self) -> u32 {
        self.bits().count_ones()
    }

    /// Iterate over the capabilities present, in bit order
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        let bits = self.bits();
        Capability::ALL
            .into_iter()
            .filter(move |cap| bits & cap.mask() != 0)
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::new()
    }
}
