//! # RustCrypto AEAD trait implementation
//!
//! This module provides implementations of the RustCrypto `aead` traits for the masked cipher.
//! The trait methods take `&self` and no randomness, so each call seeds its own
//! [`MaskingRng`] from the operating system.

use crate::masked_aead::{MaskedCipher, Protection};
use crate::masking::DEFAULT_SHARES;
use crate::random::MaskingRng;
use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use aead::generic_array::GenericArray;
use aead::{
    AeadCore, AeadInPlace, Error, KeyInit, KeySizeUser,
    consts::{U0, U16, U32},
};
use core::fmt;

/// Masked `aead/gimli24v1` cipher implementing RustCrypto traits.
#[derive(Clone)]
pub struct GimliMaskedAead<const N: usize = DEFAULT_SHARES> {
    cipher: MaskedCipher<N>,
}

impl<const N: usize> GimliMaskedAead<N> {
    /// Create a cipher with an explicit protection level.
    pub fn with_protection(key: &GenericArray<u8, U32>, protection: Protection) -> Self {
        Self {
            cipher: MaskedCipher::new(ga_key_to_array(key), protection),
        }
    }

    /// The protection level in use.
    pub const fn protection(&self) -> Protection {
        self.cipher.protection()
    }
}

impl<const N: usize> KeySizeUser for GimliMaskedAead<N> {
    type KeySize = U32;
}

impl<const N: usize> KeyInit for GimliMaskedAead<N> {
    fn new(key: &GenericArray<u8, Self::KeySize>) -> Self {
        Self::with_protection(key, Protection::default())
    }
}

impl<const N: usize> AeadCore for GimliMaskedAead<N> {
    type NonceSize = U16;
    type TagSize = U16;
    type CiphertextOverhead = U0;
}

impl<const N: usize> fmt::Debug for GimliMaskedAead<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GimliMaskedAead")
            .field("cipher", &self.cipher)
            .finish()
    }
}

/// Helper to convert between `GenericArray` and built-in array types. v0.14 does not make this
/// conversion easy in any sense.
#[inline(always)]
const fn ga_key_to_array(key: &GenericArray<u8, U32>) -> &[u8; KEY_SIZE] {
    // SAFETY: `GenericArray<T, N>` is `#[repr(transparent)]` over `[T; N]`, so both
    // references point at the same 32 bytes with the alignment of `u8`.
    unsafe { core::mem::transmute(key) }
}

/// Helper to convert between `GenericArray` and built-in array types.
#[inline(always)]
const fn ga_nonce_to_array(nonce: &GenericArray<u8, U16>) -> &[u8; NONCE_SIZE] {
    // SAFETY: as for `ga_key_to_array`.
    unsafe { core::mem::transmute(nonce) }
}

/// Helper to convert between `GenericArray` and built-in array types.
#[inline(always)]
const fn ga_tag_to_array(tag: &GenericArray<u8, U16>) -> &[u8; TAG_SIZE] {
    // SAFETY: as for `ga_key_to_array`.
    unsafe { core::mem::transmute(tag) }
}

/// Helper to convert between `GenericArray` and built-in array types.
#[inline(always)]
const fn tag_array_to_ga(tag: [u8; TAG_SIZE]) -> GenericArray<u8, U16> {
    // SAFETY: owned `[u8; 16]` and `GenericArray<u8, U16>` share a layout; `transmute`
    // rejects any size mismatch at compile time.
    unsafe { core::mem::transmute(tag) }
}

impl<const N: usize> AeadInPlace for GimliMaskedAead<N> {
    fn encrypt_in_place_detached(
        &self,
        nonce: &GenericArray<u8, Self::NonceSize>,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<GenericArray<u8, Self::TagSize>, Error> {
        let mut rng = MaskingRng::try_from_os_rng().map_err(|_| Error)?;
        let tag =
            self.cipher
                .encrypt_in_place(&mut rng, ga_nonce_to_array(nonce), associated_data, buffer);
        rng.finish();

        Ok(tag_array_to_ga(tag))
    }

    fn decrypt_in_place_detached(
        &self,
        nonce: &GenericArray<u8, Self::NonceSize>,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &GenericArray<u8, Self::TagSize>,
    ) -> Result<(), Error> {
        let mut rng = MaskingRng::try_from_os_rng().map_err(|_| Error)?;
        let result = self.cipher.decrypt_in_place(
            &mut rng,
            ga_nonce_to_array(nonce),
            associated_data,
            buffer,
            ga_tag_to_array(tag),
        );
        rng.finish();

        result.map_err(|_| Error)
    }
}
