//! # Masking randomness
//!
//! Every masked gate takes its random words from an explicit `RngCore + CryptoRng` context.
//! [`MaskingRng`] is the context the ciphers in this crate create per AEAD call: a ChaCha20
//! generator seeded from the operating system (or another CSPRNG) that re-keys itself
//! periodically and when it is dropped, so earlier output cannot be reconstructed from the
//! state it leaves behind.

use core::fmt;
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use zeroize::Zeroizing;

/// Number of 32-bit words produced between two automatic re-keys (256 ChaCha blocks).
const REKEY_WORDS: usize = 256 * 16;

/// ChaCha20-based generator of masking material.
///
/// There is no `Default` and no `Clone`: a generator only exists once it has been seeded, and
/// its stream is never duplicated.
pub struct MaskingRng {
    inner: ChaCha20Rng,
    words: usize,
}

impl MaskingRng {
    /// Seed a new generator from another cryptographic RNG.
    pub fn from_crypto_rng<R: RngCore + CryptoRng>(source: &mut R) -> Result<Self, rand_core::Error> {
        let inner = ChaCha20Rng::from_rng(source)?;
        Ok(Self::from_inner(inner))
    }

    /// Seed a new generator from the operating system.
    #[cfg(feature = "getrandom")]
    pub fn try_from_os_rng() -> Result<Self, rand_core::Error> {
        Self::from_crypto_rng(&mut rand_core::OsRng)
    }

    const fn from_inner(inner: ChaCha20Rng) -> Self {
        Self { inner, words: 0 }
    }

    /// Tear the generator down.
    ///
    /// Equivalent to dropping it; spelled out where a masked operation ends.
    pub fn finish(self) {}

    /// Replace the key with fresh output of the current stream.
    fn rekey(&mut self) {
        let mut seed = Zeroizing::new([0u8; 32]);
        self.inner.fill_bytes(&mut seed[..]);
        self.inner = ChaCha20Rng::from_seed(*seed);
        self.words = 0;
    }

    #[inline(always)]
    fn consume(&mut self, words: usize) {
        if self.words >= REKEY_WORDS {
            self.rekey();
        }
        self.words += words;
    }
}

impl RngCore for MaskingRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.consume(1);
        self.inner.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.consume(2);
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.consume(dest.len().div_ceil(4));
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.consume(dest.len().div_ceil(4));
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for MaskingRng {}

/// Deterministic seeding, for reproducing test runs only.
impl SeedableRng for MaskingRng {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_inner(ChaCha20Rng::from_seed(seed))
    }
}

impl Drop for MaskingRng {
    fn drop(&mut self) {
        self.rekey();
    }
}

impl fmt::Debug for MaskingRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingRng").finish_non_exhaustive()
    }
}
