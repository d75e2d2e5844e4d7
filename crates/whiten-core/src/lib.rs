//! Core primitives for the whitening file cipher.
//!
//! This crate provides:
//! - Packed bit sequences with big-endian bit order ([`BitString`]).
//! - Deterministic seeded keystreams ([`keystream`]).
//! - Fixed-layout key material with password-masked persistence
//!   ([`KeyMaterial`]).
//!
//! The implementation aims for clarity and testability rather than
//! constant-time guarantees; it should not be treated as side-channel
//! hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bits;
mod error;
mod key;
mod stream;

pub use crate::bits::{bit_length, BitString};
pub use crate::error::Error;
pub use crate::key::{KeyMaterial, STORED_BITS, STORED_BYTES, SUBSTITUTION_BITS, WHITENING_BITS};
pub use crate::stream::keystream;
