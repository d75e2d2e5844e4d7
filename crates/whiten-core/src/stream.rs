//! Deterministic keystream generation.
//!
//! Every draw builds a fresh ChaCha20 generator from the supplied seed
//! bytes; no generator state is shared or reseeded across calls. Identical
//! seed and count always yield the identical sequence.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::bits::BitString;

/// Folds arbitrary seed bytes into a fixed 32-byte ChaCha20 seed.
///
/// Short inputs are zero-padded, longer inputs wrap and XOR so every byte
/// contributes. A 32-byte input maps to itself.
fn fold_seed(seed: &[u8]) -> [u8; 32] {
    let mut folded = [0u8; 32];
    for (i, byte) in seed.iter().enumerate() {
        folded[i % 32] ^= byte;
    }
    folded
}

/// Draws `bits` pseudorandom bits from a generator seeded with `seed`.
pub fn keystream(seed: &[u8], bits: usize) -> BitString {
    let mut rng = ChaCha20Rng::from_seed(fold_seed(seed));
    let mut data = vec![0u8; bits.div_ceil(8)];
    rng.fill_bytes(&mut data);
    BitString::from_raw(data, bits)
}
