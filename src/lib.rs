#![no_std]
#![doc = include_str!("../README.md")]

mod aead_impl;
mod error;
mod gimli;
mod gimli_masked;
mod masked_aead;
mod masking;
mod random;

#[cfg(feature = "getrandom")]
mod rustcrypto_aead;

pub use aead_impl::{AuthenticationFailed, Tag, decrypt_in_place, encrypt_in_place};
pub use error::Error;
pub use gimli::permute;
pub use gimli_masked::{MaskedState, mask_state, permute_masked, unmask_state};
pub use masked_aead::{MaskedCipher, Protection};
pub use masking::{
    DEFAULT_SHARES, MAX_SHARES, MIN_SHARES, Masked, MaskedU16, MaskedU32, MaskedU64, MaskedWord,
    Word,
};
pub use random::MaskingRng;
#[cfg(feature = "getrandom")]
pub use rustcrypto_aead::GimliMaskedAead;

pub use aead::{self, AeadInPlace, KeyInit}; // For `GimliMaskedAead` users
pub use rand_core::{self, CryptoRng, RngCore, SeedableRng}; // For masking randomness

/// Gimli state size in bytes (48 bytes = 12 u32 words).
const STATE_SIZE: usize = 48;

/// Gimli nonce size in bytes.
pub const NONCE_SIZE: usize = 16;

/// Gimli key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Gimli tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Gimli rate in bytes.
const RATE: usize = 16;

/// Last byte index of state (used for domain separation).
const STATE_LAST_BYTE: usize = STATE_SIZE - 1;
