//! Key material with fixed layout and password-masked persistence.

use core::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::bits::BitString;
use crate::error::Error;
use crate::stream::keystream;

/// Width of the substitution key in bits.
pub const SUBSTITUTION_BITS: usize = 64;
/// Width of each whitening key in bits.
pub const WHITENING_BITS: usize = 256;
/// Width of the stored key blob in bits.
pub const STORED_BITS: usize = SUBSTITUTION_BITS + 2 * WHITENING_BITS;
/// Size of the stored key blob in bytes.
pub const STORED_BYTES: usize = STORED_BITS / 8;

/// Immutable key material for the whitening pipeline.
///
/// Holds the 64-bit substitution key, the two 256-bit whitening keys, and
/// the password-derived mask that protects the concatenated keys at rest.
/// The mask never participates in the transform itself.
///
/// The at-rest layout is positional and fixed, with no header or magic:
/// `[substitution(64) | first whitening(256) | last whitening(256)]`,
/// 72 bytes total, XORed with the mask.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    substitution: BitString,
    first_whitening: BitString,
    last_whitening: BitString,
    mask: BitString,
}

impl KeyMaterial {
    /// Generates fresh key material protected by `password`.
    ///
    /// The mask is derived deterministically from the password. The three
    /// keys are drawn from a generator seeded with fresh system entropy, in
    /// the order first whitening, last whitening, substitution, so repeated
    /// calls with the same password produce different keys. The stored key
    /// file is the only way to reuse a key.
    pub fn generate(password: &str) -> KeyMaterial {
        let mask = keystream(password.as_bytes(), STORED_BITS);

        let mut reseed = [0u8; 32];
        OsRng.fill_bytes(&mut reseed);
        let fresh = keystream(&reseed, STORED_BITS);
        let first_whitening = fresh.slice(0, WHITENING_BITS);
        let last_whitening = fresh.slice(WHITENING_BITS, 2 * WHITENING_BITS);
        let substitution = fresh.slice(2 * WHITENING_BITS, STORED_BITS);

        Self::from_parts(substitution, first_whitening, last_whitening, mask)
            .expect("freshly drawn fields have the fixed widths")
    }

    /// Reconstructs key material from its password-masked stored form.
    ///
    /// A wrong password is indistinguishable from a right one here: its mask
    /// XORs the stored bits to wrong key material, and failure shows up
    /// downstream as garbage output rather than as an error. The only way
    /// this fails is a blob that is not exactly 72 bytes.
    pub fn load(stored: &[u8], password: &str) -> Result<KeyMaterial, Error> {
        if stored.len() != STORED_BYTES {
            return Err(Error::KeySize {
                field: "stored key blob",
                expected: STORED_BITS,
                actual: stored.len().saturating_mul(8),
            });
        }
        let mask = keystream(password.as_bytes(), STORED_BITS);
        let mut bits = BitString::from_bytes(stored);
        bits.xor_in_place(&mask);

        let substitution = bits.slice(0, SUBSTITUTION_BITS);
        let first_whitening = bits.slice(SUBSTITUTION_BITS, SUBSTITUTION_BITS + WHITENING_BITS);
        let last_whitening = bits.slice(SUBSTITUTION_BITS + WHITENING_BITS, STORED_BITS);
        Self::from_parts(substitution, first_whitening, last_whitening, mask)
    }

    /// Assembles key material from explicit fields, validating every width.
    pub fn from_parts(
        substitution: BitString,
        first_whitening: BitString,
        last_whitening: BitString,
        mask: BitString,
    ) -> Result<KeyMaterial, Error> {
        check_width("substitution key", &substitution, SUBSTITUTION_BITS)?;
        check_width("first whitening key", &first_whitening, WHITENING_BITS)?;
        check_width("last whitening key", &last_whitening, WHITENING_BITS)?;
        check_width("obfuscation mask", &mask, STORED_BITS)?;
        Ok(KeyMaterial {
            substitution,
            first_whitening,
            last_whitening,
            mask,
        })
    }

    /// Packs the keys into the masked at-rest form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bits = BitString::concat(&[
            &self.substitution,
            &self.first_whitening,
            &self.last_whitening,
        ]);
        bits.xor_in_place(&self.mask);
        bits.to_bytes().expect("stored layout is byte aligned")
    }

    /// The 64-bit substitution key.
    pub fn substitution_key(&self) -> &BitString {
        &self.substitution
    }

    /// The 256-bit key seeding the first whitening pass.
    pub fn first_whitening_key(&self) -> &BitString {
        &self.first_whitening
    }

    /// The 256-bit key seeding the last whitening pass.
    pub fn last_whitening_key(&self) -> &BitString {
        &self.last_whitening
    }
}

fn check_width(field: &'static str, bits: &BitString, expected: usize) -> Result<(), Error> {
    if bits.len() != expected {
        return Err(Error::KeySize {
            field,
            expected,
            actual: bits.len(),
        });
    }
    Ok(())
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}
