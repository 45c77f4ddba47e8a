//! Error types for capability table handling
//!
//! Every error here describes a mistake in a compiled-in descriptor table.
//! They are configuration errors: the boot path treats them as fatal.

use core::fmt;

use crate::capability::Capability;

/// Problems found while validating a capability table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuFeatureError {
    /// Two descriptors claim the same capability id
    DuplicateCapability(Capability),
    /// A descriptor before the end marker has no matcher
    MissingMatcher(usize),
    /// A descriptor has an empty description
    MissingDescription(usize),
    /// The field at this position does not fit inside a 64-bit register
    FieldOutOfRange {
        /// Index of the offending descriptor
        index: usize,
        /// The descriptor's field position
        field_pos: u32,
    },
}

impl fmt::Display for CpuFeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCapability(cap) => {
                write!(f, "capability {:?} described more than once", cap)
            }
            Self::MissingMatcher(index) => write!(f, "descriptor {} has no matcher", index),
            Self::MissingDescription(index) => {
                write!(f, "descriptor {} has no description", index)
            }
            Self::FieldOutOfRange { index, field_pos } => write!(
                f,
                "descriptor {} field position {} exceeds register width",
                index, field_pos
            ),
        }
    }
}

/// Result type for capability table operations
pub type CpuFeatureResult<T> = Result<T, CpuFeatureError>;
