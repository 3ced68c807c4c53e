//! # Masked `aead/gimli24v1`
//!
//! [`MaskedCipher`] computes the same ciphertexts and tags as the unmasked
//! [`encrypt_in_place`](crate::encrypt_in_place), with the key handled as masked shares.
//!
//! - [`Protection::KeyOnly`] masks the key and nonce absorption, which is the only permutation
//!   call that sees the key directly, then unmasks and processes associated data and message
//!   with the unmasked permutation.
//! - [`Protection::ProtectAll`] keeps the state masked until the tag is extracted. Associated
//!   data and plaintext are public or about to be output, so they are folded in as public
//!   constants on the first share.
//!
//! The caller supplies the randomness context for every call.
//!
//! ```
//! use gimli_masked::{MaskedCipher, MaskingRng, Protection, SeedableRng};
//!
//! let cipher = MaskedCipher::<4>::new(&[7u8; 32], Protection::ProtectAll);
//! let nonce = [1u8; 16];
//!
//! let mut rng = MaskingRng::seed_from_u64(0);
//! let mut buffer = *b"attack at dawn";
//! let tag = cipher.encrypt_in_place(&mut rng, &nonce, b"header", &mut buffer);
//!
//! cipher
//!     .decrypt_in_place(&mut rng, &nonce, b"header", &mut buffer, &tag)
//!     .expect("authentication failed");
//! assert_eq!(&buffer, b"attack at dawn");
//! ```

use crate::aead_impl::{self, AuthenticationFailed, Tag};
use crate::error::Error;
use crate::gimli::State;
use crate::gimli_masked::{MaskedState, unmask_state};
use crate::masking::DEFAULT_SHARES;
use crate::{KEY_SIZE, NONCE_SIZE, RATE, TAG_SIZE};
use core::fmt;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Which parts of an AEAD operation run on masked state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Protection {
    /// Mask only the key and nonce absorption.
    KeyOnly,
    /// Mask every permutation call up to tag extraction.
    #[default]
    ProtectAll,
}

/// `aead/gimli24v1` with the key processed in `N` masked shares.
#[derive(Clone)]
pub struct MaskedCipher<const N: usize = DEFAULT_SHARES> {
    key: [u8; KEY_SIZE],
    protection: Protection,
}

impl<const N: usize> MaskedCipher<N> {
    /// Create a cipher for `key` with the given protection level.
    pub fn new(key: &[u8; KEY_SIZE], protection: Protection) -> Self {
        Self {
            key: *key,
            protection,
        }
    }

    /// The protection level in use.
    pub const fn protection(&self) -> Protection {
        self.protection
    }

    /// Encrypt `buffer` in place and return the tag.
    #[must_use]
    pub fn encrypt_in_place<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Tag {
        let mut state = initialize::<N, R>(&self.key, nonce, rng);

        match self.protection {
            Protection::KeyOnly => {
                let mut state = unmask(&state);
                aead_impl::absorb(&mut state, associated_data);
                aead_impl::encrypt(&mut state, buffer);
                aead_impl::tag(&state)
            }
            Protection::ProtectAll => {
                absorb(&mut state, associated_data, rng);
                encrypt(&mut state, buffer, rng);
                state.rate_bytes()
            }
        }
    }

    /// Decrypt `buffer` in place and verify `tag` in constant time.
    ///
    /// The buffer is zeroed when the tag does not match.
    pub fn decrypt_in_place<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &Tag,
    ) -> Result<(), AuthenticationFailed> {
        let mut state = initialize::<N, R>(&self.key, nonce, rng);

        let computed = match self.protection {
            Protection::KeyOnly => {
                let mut state = unmask(&state);
                aead_impl::absorb(&mut state, associated_data);
                aead_impl::decrypt(&mut state, buffer);
                aead_impl::tag(&state)
            }
            Protection::ProtectAll => {
                absorb(&mut state, associated_data, rng);
                decrypt(&mut state, buffer, rng);
                state.rate_bytes()
            }
        };

        aead_impl::verify_tag(&computed, tag, buffer)
    }

    /// Decrypt a buffer holding `ciphertext || tag`, returning the plaintext part.
    pub fn open_in_place<'a, R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
        buffer: &'a mut [u8],
    ) -> Result<&'a mut [u8], Error> {
        let Some(message_len) = buffer.len().checked_sub(TAG_SIZE) else {
            return Err(Error::CiphertextTooShort);
        };

        let (message, tag_bytes) = buffer.split_at_mut(message_len);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(tag_bytes);

        self.decrypt_in_place(rng, nonce, associated_data, message, &tag)?;
        Ok(message)
    }
}

impl<const N: usize> Zeroize for MaskedCipher<N> {
    fn zeroize(&mut self) {
        self.key.zeroize();
    }
}

impl<const N: usize> Drop for MaskedCipher<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for MaskedCipher<N> {}

impl<const N: usize> fmt::Debug for MaskedCipher<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedCipher")
            .field("shares", &N)
            .field("protection", &self.protection)
            .finish_non_exhaustive()
    }
}

/// Mask the nonce and key into a fresh state and apply the masked permutation.
fn initialize<const N: usize, R: RngCore + CryptoRng>(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    rng: &mut R,
) -> MaskedState<N> {
    let mut words = Zeroizing::new([0u32; 12]);
    for (word, bytes) in words
        .iter_mut()
        .zip(nonce.chunks_exact(4).chain(key.chunks_exact(4)))
    {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let mut state = MaskedState::mask(&words, rng);
    state.permute(rng);
    state
}

/// Recombine the lanes directly into the unmasked sponge state.
fn unmask<const N: usize>(masked: &MaskedState<N>) -> State {
    let mut state = State::new();
    unmask_state(&mut state.0, masked.lanes());
    state
}

/// Pad the final partial block: data, a single `0x01` byte, zeroes.
fn pad(remainder: &[u8]) -> Zeroizing<[u8; RATE]> {
    let mut padded = Zeroizing::new([0u8; RATE]);
    padded[..remainder.len()].copy_from_slice(remainder);
    padded[remainder.len()] = 0x01;
    padded
}

/// Absorb associated data into the masked state.
fn absorb<const N: usize, R: RngCore + CryptoRng>(
    state: &mut MaskedState<N>,
    associated_data: &[u8],
    rng: &mut R,
) {
    let mut iter = associated_data.chunks_exact(RATE);

    for chunk in iter.by_ref() {
        state.xor_block(chunk);
        state.permute(rng);
    }

    let padded = pad(iter.remainder());
    state.xor_block(&padded[..]);
    state.separate_domain();
    state.permute(rng);
}

/// Encrypt `buffer` in place under the masked state.
fn encrypt<const N: usize, R: RngCore + CryptoRng>(
    state: &mut MaskedState<N>,
    buffer: &mut [u8],
    rng: &mut R,
) {
    let mut iter = buffer.chunks_exact_mut(RATE);

    for chunk in &mut iter {
        state.xor_block(chunk);
        chunk.copy_from_slice(&state.rate_bytes());
        state.permute(rng);
    }

    let remainder = iter.into_remainder();
    let len = remainder.len();
    let padded = pad(remainder);
    state.xor_block(&padded[..]);
    remainder.copy_from_slice(&state.rate_bytes()[..len]);

    state.separate_domain();
    state.permute(rng);
}

/// Decrypt `buffer` in place under the masked state.
///
/// Each plaintext block is the unmasked rate XOR the ciphertext; XOR'ing it back in as a
/// public constant leaves the ciphertext in the rate, as encryption does.
fn decrypt<const N: usize, R: RngCore + CryptoRng>(
    state: &mut MaskedState<N>,
    buffer: &mut [u8],
    rng: &mut R,
) {
    let mut iter = buffer.chunks_exact_mut(RATE);

    for chunk in &mut iter {
        let keystream = Zeroizing::new(state.rate_bytes());
        for (byte, key_byte) in chunk.iter_mut().zip(keystream.iter()) {
            *byte ^= key_byte;
        }
        state.xor_block(chunk);
        state.permute(rng);
    }

    let remainder = iter.into_remainder();
    let keystream = Zeroizing::new(state.rate_bytes());
    for (byte, key_byte) in remainder.iter_mut().zip(keystream.iter()) {
        *byte ^= key_byte;
    }
    let padded = pad(remainder);
    state.xor_block(&padded[..]);

    state.separate_domain();
    state.permute(rng);
}
