//! Pluggable substitution stage between the two whitening passes.
//!
//! The pipeline treats an absent stage as the identity transform; nothing in
//! the default construction wires one in. [`KeyedSbox`] is a concrete stage
//! for callers that opt into it.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use whiten_core::{BitString, Error, SUBSTITUTION_BITS};

/// Number of bytes in a substitution block.
pub const BLOCK_BYTES: usize = 8;

/// Substitution block matching the 64-bit stage key.
pub type Block = [u8; BLOCK_BYTES];

/// Keyed invertible block transform applied between the whitening passes.
///
/// Implementations must satisfy `invert(apply(b)) == b` for every block.
pub trait SubstitutionStage {
    /// Transforms a block in place on the encrypt path.
    fn apply(&self, block: &mut Block);

    /// Undoes [`apply`](Self::apply) on the decrypt path.
    fn invert(&self, block: &mut Block);
}

/// Keyed S-box stage: a seeded byte permutation plus a one-byte rotation
/// across the block.
///
/// The permutation is drawn with Fisher–Yates from a ChaCha20 generator
/// seeded by the 64-bit substitution key, so equal keys build equal tables.
pub struct KeyedSbox {
    forward: [u8; 256],
    inverse: [u8; 256],
}

impl KeyedSbox {
    /// Builds the stage from a 64-bit substitution key.
    pub fn new(key: &BitString) -> Result<KeyedSbox, Error> {
        if key.len() != SUBSTITUTION_BITS {
            return Err(Error::KeySize {
                field: "substitution key",
                expected: SUBSTITUTION_BITS,
                actual: key.len(),
            });
        }
        let key_bytes = key.to_bytes()?;
        let mut seed = [0u8; 32];
        seed[..key_bytes.len()].copy_from_slice(&key_bytes);
        let mut rng = ChaCha20Rng::from_seed(seed);

        let mut forward = [0u8; 256];
        for (i, entry) in forward.iter_mut().enumerate() {
            *entry = i as u8;
        }
        for i in (1..256usize).rev() {
            let j = (rng.next_u32() as usize) % (i + 1);
            forward.swap(i, j);
        }

        let mut inverse = [0u8; 256];
        for (i, &mapped) in forward.iter().enumerate() {
            inverse[mapped as usize] = i as u8;
        }
        Ok(KeyedSbox { forward, inverse })
    }
}

impl SubstitutionStage for KeyedSbox {
    fn apply(&self, block: &mut Block) {
        for byte in block.iter_mut() {
            *byte = self.forward[*byte as usize];
        }
        block.rotate_left(1);
    }

    fn invert(&self, block: &mut Block) {
        block.rotate_right(1);
        for byte in block.iter_mut() {
            *byte = self.inverse[*byte as usize];
        }
    }
}
