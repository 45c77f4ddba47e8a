//! ID register field extraction
//!
//! Arm identification registers are split into 4-bit fields. Most fields are
//! signed: a value of 0xF (-1) means "not implemented" and must compare below
//! any positive minimum, while larger positive values describe later
//! revisions of the same feature.

/// Width of every ID register feature field, in bits
pub const FIELD_WIDTH: u32 = 4;

/// Extract the signed field starting at bit `shift`.
///
/// Fields that run off the top of the register are truncated to the bits
/// that exist, and a `shift` of 64 or more yields 0.
#[inline]
#[must_use]
pub const fn extract_signed_field(reg: u64, shift: u32) -> i64 {
    if shift >= u64::BITS {
        return 0;
    }
    let width = if shift + FIELD_WIDTH > u64::BITS {
        u64::BITS - shift
    } else {
        FIELD_WIDTH
    };
    // Move the field to the top bits, then arithmetic-shift it back down
    ((reg << (u64::BITS - width - shift)) as i64) >> (u64::BITS - width)
}

/// Extract the unsigned field starting at bit `shift`.
#[inline]
#[must_use]
pub const fn extract_unsigned_field(reg: u64, shift: u32) -> u64 {
    if shift >= u64::BITS {
        return 0;
    }
    (reg >> shift) & ((1 << FIELD_WIDTH) - 1)
}

/// Check whether the signed field at `shift` is at least `min`.
#[inline]
#[must_use]
pub const fn field_at_least(reg: u64, shift: u32, min: i64) -> bool {
    extract_signed_field(reg, shift) >= min
}
