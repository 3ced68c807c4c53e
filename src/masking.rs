//! # Boolean masking over N shares
//!
//! A [`Masked`] word holds `N` shares whose XOR is the secret value. Linear operations (XOR,
//! shifts, rotations, swap-move with a public mask) are applied share by share. The nonlinear
//! gates ([`Masked::and`], [`Masked::or`], [`Masked::and_not`]) combine every pair of shares
//! through a fresh random word, consuming `N * (N - 1) / 2` random words per call.
//!
//! The number of shares is a const parameter checked at compile time; [`DEFAULT_SHARES`] is the
//! value selected by the `shares-*` cargo features.
//!
//! ```
//! use gimli_masked::{Masked, MaskingRng, SeedableRng};
//!
//! let mut rng = MaskingRng::seed_from_u64(7);
//!
//! let a = Masked::<u32, 3>::input(0xdead_beef, &mut rng);
//! let b = Masked::<u32, 3>::input(0x0ff0_0ff0, &mut rng);
//!
//! let mut t = Masked::<u32, 3>::zero();
//! t.and(&a, &b, &mut rng);
//!
//! assert_eq!(t.output(), 0xdead_beef & 0x0ff0_0ff0);
//! ```

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, BitXorAssign, Not, Shl, Shr};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Smallest supported number of shares.
pub const MIN_SHARES: usize = 2;

/// Largest supported number of shares.
pub const MAX_SHARES: usize = 6;

/// Number of shares used by the default-parameterized types of this crate.
pub const DEFAULT_SHARES: usize = if cfg!(feature = "shares-2") {
    2
} else if cfg!(feature = "shares-3") {
    3
} else if cfg!(feature = "shares-5") {
    5
} else if cfg!(feature = "shares-6") {
    6
} else {
    4
};

mod sealed {
    pub trait Sealed {}
}

/// Unsigned machine word that can be split into shares.
pub trait Word:
    sealed::Sealed
    + Copy
    + Eq
    + fmt::Debug
    + Zeroize
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + BitXorAssign
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// All bits clear.
    const ZERO: Self;

    /// Width of the word in bits.
    const BITS: u32;

    /// Draw a uniformly random word.
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self;

    /// Rotate left by `bits`.
    fn rotate_left(self, bits: u32) -> Self;

    /// Rotate right by `bits`.
    fn rotate_right(self, bits: u32) -> Self;
}

macro_rules! impl_word {
    ($ty:ty, $rng:ident => $draw:expr) => {
        impl sealed::Sealed for $ty {}

        impl Word for $ty {
            const ZERO: Self = 0;
            const BITS: u32 = <$ty>::BITS;

            #[inline(always)]
            fn random<R: RngCore + CryptoRng>($rng: &mut R) -> Self {
                $draw
            }

            #[inline(always)]
            fn rotate_left(self, bits: u32) -> Self {
                <$ty>::rotate_left(self, bits)
            }

            #[inline(always)]
            fn rotate_right(self, bits: u32) -> Self {
                <$ty>::rotate_right(self, bits)
            }
        }
    };
}

impl_word!(u16, rng => rng.next_u32() as u16);
impl_word!(u32, rng => rng.next_u32());
impl_word!(u64, rng => rng.next_u64());

/// A secret word split into `N` Boolean shares.
///
/// The first share is the one public constants are folded into.
#[derive(Clone, Copy)]
pub struct Masked<W: Word, const N: usize> {
    pub(crate) shares: [W; N],
}

/// Masked 16-bit word.
pub type MaskedU16<const N: usize> = Masked<u16, N>;

/// Masked 32-bit word.
pub type MaskedU32<const N: usize> = Masked<u32, N>;

/// Masked 64-bit word.
pub type MaskedU64<const N: usize> = Masked<u64, N>;

/// Masked 32-bit word with [`DEFAULT_SHARES`] shares.
pub type MaskedWord = Masked<u32, DEFAULT_SHARES>;

impl<W: Word, const N: usize> Masked<W, N> {
    const SUPPORTED: () = assert!(
        N >= MIN_SHARES && N <= MAX_SHARES,
        "the number of masking shares must be between 2 and 6"
    );

    /// A masked zero with every share cleared.
    ///
    /// Share counts outside `2..=6` are rejected when the type is instantiated:
    ///
    /// ```compile_fail
    /// use gimli_masked::Masked;
    ///
    /// let word = Masked::<u32, 7>::zero();
    /// assert_eq!(word.output(), 0);
    /// ```
    ///
    /// ```compile_fail
    /// use gimli_masked::Masked;
    ///
    /// let word = Masked::<u32, 1>::zero();
    /// assert_eq!(word.output(), 0);
    /// ```
    #[inline(always)]
    pub const fn zero() -> Self {
        let () = Self::SUPPORTED;
        Self {
            shares: [W::ZERO; N],
        }
    }

    /// Build a masked word from raw shares.
    #[inline(always)]
    pub const fn from_shares(shares: [W; N]) -> Self {
        let () = Self::SUPPORTED;
        Self { shares }
    }

    /// Mask `value`: shares `1..N` are fresh random words and share 0 is `value` XOR'd with all
    /// of them.
    #[inline]
    pub fn input<R: RngCore + CryptoRng>(value: W, rng: &mut R) -> Self {
        let mut masked = Self::zero();
        let mut first = value;
        for share in masked.shares[1..].iter_mut() {
            *share = W::random(rng);
            first ^= *share;
        }
        masked.shares[0] = first;
        masked
    }

    /// Recombine the shares into the unmasked value.
    #[inline]
    pub fn output(&self) -> W {
        self.shares[1..]
            .iter()
            .fold(self.shares[0], |acc, &share| acc ^ share)
    }

    /// The raw shares.
    #[inline(always)]
    pub const fn shares(&self) -> &[W; N] {
        &self.shares
    }

    /// Clear every share.
    #[inline(always)]
    pub fn set_zero(&mut self) {
        self.shares = [W::ZERO; N];
    }

    /// `self ^= other`, share by share.
    #[inline]
    pub fn xor(&mut self, other: &Self) {
        for (share, &rhs) in self.shares.iter_mut().zip(other.shares.iter()) {
            *share ^= rhs;
        }
    }

    /// `self ^= value` for a public `value`, folded into the first share only.
    #[inline(always)]
    pub fn xor_const(&mut self, value: W) {
        self.shares[0] ^= value;
    }

    /// `self = !self`, applied to the first share only.
    #[inline(always)]
    pub fn not(&mut self) {
        self.shares[0] = !self.shares[0];
    }

    /// `self ^= x & y`.
    ///
    /// Output share `i` receives `x[i] & y[i]`; every cross term `x[i] & y[j]` lands in a share
    /// together with a fresh random word that is also folded into the partner share, so no
    /// output share depends on more than one input share pair without a mask.
    pub fn and<R: RngCore + CryptoRng>(&mut self, x: &Self, y: &Self, rng: &mut R) {
        let lead = x.shares[0] & y.shares[0];
        self.multiply(&x.shares, &y.shares, lead, rng);
    }

    /// `self ^= x | y`.
    ///
    /// Computed as `!(!x & !y)`: the inversions and the final NOT only touch the first share.
    pub fn or<R: RngCore + CryptoRng>(&mut self, x: &Self, y: &Self, rng: &mut R) {
        let lead = x.shares[0] | y.shares[0];
        let mut xs = x.shares;
        let mut ys = y.shares;
        xs[0] = !xs[0];
        ys[0] = !ys[0];
        self.multiply(&xs, &ys, lead, rng);
        xs.zeroize();
        ys.zeroize();
    }

    /// `self ^= !x & y`.
    pub fn and_not<R: RngCore + CryptoRng>(&mut self, x: &Self, y: &Self, rng: &mut R) {
        let lead = !x.shares[0] & y.shares[0];
        let mut xs = x.shares;
        xs[0] = !xs[0];
        self.multiply(&xs, &y.shares, lead, rng);
        xs.zeroize();
    }

    /// Shared core of the nonlinear gates. `lead` is the diagonal term of share 0, which may
    /// differ from `x[0] & y[0]` when share 0 carries an inversion.
    #[inline(always)]
    fn multiply<R: RngCore + CryptoRng>(
        &mut self,
        x: &[W; N],
        y: &[W; N],
        lead: W,
        rng: &mut R,
    ) {
        for i in 0..N {
            self.shares[i] ^= if i == 0 { lead } else { x[i] & y[i] };
            for j in (i + 1)..N {
                let mut temp = W::random(rng);
                self.shares[i] ^= temp;
                temp ^= y[j] & x[i];
                self.shares[j] = (self.shares[j] ^ temp) ^ (x[j] & y[i]);
            }
        }
    }

    #[inline(always)]
    fn map(&self, f: impl Fn(W) -> W) -> Self {
        let mut out = *self;
        for share in out.shares.iter_mut() {
            *share = f(*share);
        }
        out
    }

    /// Shift every share left by the public amount `bits`.
    #[inline]
    pub fn shl(&self, bits: u32) -> Self {
        self.map(|share| share << bits)
    }

    /// Shift every share right by the public amount `bits`.
    #[inline]
    pub fn shr(&self, bits: u32) -> Self {
        self.map(|share| share >> bits)
    }

    /// Rotate every share left by the public amount `bits`.
    #[inline]
    pub fn rotate_left(&self, bits: u32) -> Self {
        self.map(|share| share.rotate_left(bits))
    }

    /// Rotate every share right by the public amount `bits`.
    #[inline]
    pub fn rotate_right(&self, bits: u32) -> Self {
        self.map(|share| share.rotate_right(bits))
    }

    /// Exchange all shares of `self` and `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Swap-move with a public `mask`, applied share by share:
    ///
    /// ```text
    /// t = (self ^ (other >> shift)) & mask
    /// self ^= t
    /// other ^= t << shift
    /// ```
    #[inline]
    pub fn swap_move(&mut self, other: &mut Self, mask: W, shift: u32) {
        for (a, b) in self.shares.iter_mut().zip(other.shares.iter_mut()) {
            let t = (*a ^ (*b >> shift)) & mask;
            *a ^= t;
            *b ^= t << shift;
        }
    }
}

impl<W: Word, const N: usize> Default for Masked<W, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<W: Word, const N: usize> Zeroize for Masked<W, N> {
    fn zeroize(&mut self) {
        self.shares.zeroize();
    }
}

impl<W: Word, const N: usize> fmt::Debug for Masked<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Masked")
            .field("shares", &N)
            .finish_non_exhaustive()
    }
}
