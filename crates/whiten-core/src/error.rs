//! Error taxonomy for the core primitives.

use thiserror::Error as ThisError;

/// Errors produced by bit conversion, keystream, and key operations.
///
/// All of these are structural errors (malformed input, wrong sizes) and are
/// surfaced to the caller rather than recovered. A wrong password is not in
/// this taxonomy: loading with one yields wrong key bits, not an error.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    /// A requested bit length is too large to represent.
    #[error("bit length of a {bytes}-byte buffer is not representable")]
    InvalidLength {
        /// Byte length whose bit count overflowed.
        bytes: usize,
    },

    /// A bit sequence being packed into bytes is not byte aligned.
    #[error("bit sequence of {bits} bits is not a multiple of 8")]
    Misaligned {
        /// Offending bit count.
        bits: usize,
    },

    /// A key field deviates from the fixed 64/256/256-bit layout.
    #[error("{field} must be {expected} bits, got {actual}")]
    KeySize {
        /// Name of the malformed field.
        field: &'static str,
        /// Required width in bits.
        expected: usize,
        /// Provided width in bits.
        actual: usize,
    },
}
