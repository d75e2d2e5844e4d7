//! The two-stage whitening transform.

use whiten_core::{bit_length, keystream, BitString, Error, KeyMaterial};

use crate::substitution::{SubstitutionStage, BLOCK_BYTES};

/// Transform direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext back to plaintext.
    Decrypt,
}

/// Applies the two-stage whitening transform to byte buffers.
///
/// Both directions run the same pair of keystream XORs; XOR self-cancels
/// regardless of the order the streams are reapplied in, so only the
/// substitution stage is direction-sensitive. Output length always equals
/// input length.
pub struct WhiteningCipher {
    key: KeyMaterial,
    stage: Option<Box<dyn SubstitutionStage>>,
}

impl WhiteningCipher {
    /// Creates a cipher with no substitution stage; the slot between the
    /// whitening passes behaves as the identity transform.
    pub fn new(key: KeyMaterial) -> WhiteningCipher {
        WhiteningCipher { key, stage: None }
    }

    /// Creates a cipher with an explicit substitution stage.
    pub fn with_stage(key: KeyMaterial, stage: Box<dyn SubstitutionStage>) -> WhiteningCipher {
        WhiteningCipher {
            key,
            stage: Some(stage),
        }
    }

    /// Transforms `data`, returning a buffer of identical length.
    ///
    /// Encrypting and decrypting with the same key are inverse operations.
    pub fn transform(&self, data: &[u8], mode: Mode) -> Result<Vec<u8>, Error> {
        let bits = bit_length(data.len())?;
        let mut state = BitString::from_bytes(data);

        let first_seed = self.key.first_whitening_key().to_bytes()?;
        state.xor_in_place(&keystream(&first_seed, bits));

        if let Some(stage) = &self.stage {
            let mut bytes = state.to_bytes()?;
            substitute(stage.as_ref(), &mut bytes, mode);
            state = BitString::from_bytes(&bytes);
        }

        let last_seed = self.key.last_whitening_key().to_bytes()?;
        state.xor_in_place(&keystream(&last_seed, bits));

        state.to_bytes()
    }
}

/// Runs the stage over each full block; a trailing partial block passes
/// through untouched.
fn substitute(stage: &dyn SubstitutionStage, bytes: &mut [u8], mode: Mode) {
    for chunk in bytes.chunks_exact_mut(BLOCK_BYTES) {
        let mut block = [0u8; BLOCK_BYTES];
        block.copy_from_slice(chunk);
        match mode {
            Mode::Encrypt => stage.apply(&mut block),
            Mode::Decrypt => stage.invert(&mut block),
        }
        chunk.copy_from_slice(&block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitution::KeyedSbox;
    use rand::RngCore;

    fn cipher_for(password: &str) -> WhiteningCipher {
        WhiteningCipher::new(KeyMaterial::generate(password))
    }

    #[test]
    fn hello_round_trip() {
        let cipher = cipher_for("password");
        let plaintext = b"HELLO";
        let ciphertext = cipher.transform(plaintext, Mode::Encrypt).expect("encrypt");
        assert_eq!(ciphertext.len(), 5);
        let decrypted = cipher.transform(&ciphertext, Mode::Decrypt).expect("decrypt");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn round_trip_preserves_length_across_sizes() {
        let cipher = cipher_for("sizes");
        let mut rng = rand::thread_rng();
        for len in [0usize, 1, 7, 8, 9, 63, 64, 65, 1000] {
            let mut data = vec![0u8; len];
            rng.fill_bytes(&mut data);
            let ciphertext = cipher.transform(&data, Mode::Encrypt).expect("encrypt");
            assert_eq!(ciphertext.len(), len);
            let decrypted = cipher.transform(&ciphertext, Mode::Decrypt).expect("decrypt");
            assert_eq!(decrypted, data);
        }
    }

    #[test]
    fn ciphertext_differs_from_plaintext() {
        let cipher = cipher_for("differs");
        let data = vec![0u8; 128];
        let ciphertext = cipher.transform(&data, Mode::Encrypt).expect("encrypt");
        assert_ne!(ciphertext, data);
    }

    #[test]
    fn wrong_key_yields_garbage_not_errors() {
        // Generation is not password-deterministic, so a second key made
        // from the same password still decrypts to garbage.
        let cipher = cipher_for("right password");
        let other = cipher_for("right password");
        let data = b"a moderately long plaintext for the mismatch check".to_vec();
        let ciphertext = cipher.transform(&data, Mode::Encrypt).expect("encrypt");
        let decrypted = other.transform(&ciphertext, Mode::Decrypt).expect("decrypt");
        assert_ne!(decrypted, data);
    }

    #[test]
    fn whitening_only_transform_is_an_involution() {
        // With no stage configured the transform is pure XOR, so running the
        // encrypt direction twice also recovers the input.
        let cipher = cipher_for("involution");
        let data = b"whitening only".to_vec();
        let once = cipher.transform(&data, Mode::Encrypt).expect("first pass");
        let twice = cipher.transform(&once, Mode::Encrypt).expect("second pass");
        assert_eq!(twice, data);
    }

    #[test]
    fn staged_round_trip_recovers_plaintext() {
        let key = KeyMaterial::generate("staged");
        let stage = KeyedSbox::new(key.substitution_key()).expect("64-bit key");
        let cipher = WhiteningCipher::with_stage(key, Box::new(stage));
        let data = b"thirty-two bytes of plaintext!!!".to_vec();
        let ciphertext = cipher.transform(&data, Mode::Encrypt).expect("encrypt");
        assert_eq!(ciphertext.len(), data.len());
        let decrypted = cipher.transform(&ciphertext, Mode::Decrypt).expect("decrypt");
        assert_eq!(decrypted, data);
    }

    #[test]
    fn staged_transform_is_direction_sensitive() {
        // Applying the stage twice instead of inverting it must not recover
        // the input; only the whitening XORs self-cancel.
        let key = KeyMaterial::generate("direction");
        let stage = KeyedSbox::new(key.substitution_key()).expect("64-bit key");
        let cipher = WhiteningCipher::with_stage(key, Box::new(stage));
        let data = b"thirty-two bytes of plaintext!!!".to_vec();
        let once = cipher.transform(&data, Mode::Encrypt).expect("first pass");
        let twice = cipher.transform(&once, Mode::Encrypt).expect("second pass");
        assert_ne!(twice, data);
    }

    #[test]
    fn staged_partial_trailing_block_round_trips() {
        let key = KeyMaterial::generate("partial");
        let stage = KeyedSbox::new(key.substitution_key()).expect("64-bit key");
        let cipher = WhiteningCipher::with_stage(key, Box::new(stage));
        let data = vec![0xabu8; 13];
        let ciphertext = cipher.transform(&data, Mode::Encrypt).expect("encrypt");
        let decrypted = cipher.transform(&ciphertext, Mode::Decrypt).expect("decrypt");
        assert_eq!(decrypted, data);
    }
}
