//! Two-stage whitening file cipher built on `whiten-core`.
//!
//! The pipeline pre-whitens a buffer with one keyed keystream, runs an
//! optional substitution stage per 8-byte block, and post-whitens with a
//! second keystream. XOR self-cancels regardless of order, so the same
//! procedure serves both directions; only the substitution stage (when one
//! is configured) distinguishes decryption.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod session;
mod substitution;

pub use crate::cipher::{Mode, WhiteningCipher};
pub use crate::session::{FileSession, SessionError};
pub use crate::substitution::{Block, KeyedSbox, SubstitutionStage, BLOCK_BYTES};
