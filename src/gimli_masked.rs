//! # Masked Gimli permutation
//!
//! The 24-round Gimli permutation over a state whose 12 lanes are [`MaskedU32`] words. The
//! SP-box is evaluated share by share around three masked gates per column; the lane swaps are
//! share-wise moves and the round constant goes into the first share of lane 0 only. Unmasking
//! the result gives exactly what [`permute`](crate::permute) gives on the unmasked input.
//!
//! ```
//! use gimli_masked::{MaskedState, MaskingRng, SeedableRng, permute};
//!
//! let mut rng = MaskingRng::seed_from_u64(1);
//! let input: [u32; 12] = core::array::from_fn(|i| i as u32 * 0x0101_0101);
//!
//! let mut masked = MaskedState::<3>::mask(&input, &mut rng);
//! masked.permute(&mut rng);
//!
//! let mut plain = input;
//! permute(&mut plain);
//! assert_eq!(masked.unmask(), plain);
//! ```

use crate::RATE;
use crate::gimli::{ROUND_CONSTANT, ROUNDS};
use crate::masking::{DEFAULT_SHARES, MaskedU32};
use core::fmt;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Lane carrying the domain separation bit.
const LAST_LANE: usize = 11;

/// Scratch words for one SP-box: the rotated `x` and `y` lanes and the gate output `t`.
struct Temporaries<const N: usize> {
    x: MaskedU32<N>,
    y: MaskedU32<N>,
    t: MaskedU32<N>,
}

impl<const N: usize> Temporaries<N> {
    const fn new() -> Self {
        Self {
            x: MaskedU32::zero(),
            y: MaskedU32::zero(),
            t: MaskedU32::zero(),
        }
    }
}

impl<const N: usize> Drop for Temporaries<N> {
    fn drop(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.t.zeroize();
    }
}

/// Masked SP-box on one column (lanes `column`, `column + 4`, `column + 8`).
///
/// Each gate is a first-order non-complete masked AND/OR: its output shares depend on at most
/// one share of each input beyond what the fresh per-call randomness hides. `t` is cleared
/// before every gate so no gate output is ever combined with another before it is shifted into
/// its lane.
#[inline(always)]
fn sp_box<const N: usize, R: RngCore + CryptoRng>(
    state: &mut [MaskedU32<N>; 12],
    column: usize,
    tmp: &mut Temporaries<N>,
    rng: &mut R,
) {
    let (row0, rest) = state.split_at_mut(4);
    let (row1, row2) = rest.split_at_mut(4);
    let s0 = &mut row0[column];
    let s4 = &mut row1[column];
    let s8 = &mut row2[column];
    let Temporaries { x, y, t } = tmp;

    for i in (0..N).rev() {
        x.shares[i] = s0.shares[i].rotate_left(24);
        y.shares[i] = s4.shares[i].rotate_left(9);
        s4.shares[i] = y.shares[i] ^ x.shares[i];
    }

    // s4 ^= (x | s8) << 1
    t.set_zero();
    t.or(x, s8, rng);
    for i in (0..N).rev() {
        s4.shares[i] ^= t.shares[i] << 1;
        s0.shares[i] = s8.shares[i] ^ y.shares[i];
    }

    // s0 ^= (x & y) << 3
    t.set_zero();
    t.and(x, y, rng);
    for i in (0..N).rev() {
        s0.shares[i] ^= t.shares[i] << 3;
    }

    // s8 = x ^ (s8 << 1) ^ ((y & s8) << 2)
    t.set_zero();
    t.and(y, s8, rng);
    for i in (0..N).rev() {
        s8.shares[i] = (s8.shares[i] << 1) ^ (t.shares[i] << 2) ^ x.shares[i];
    }
}

#[inline(always)]
fn sp_layer<const N: usize, R: RngCore + CryptoRng>(
    state: &mut [MaskedU32<N>; 12],
    tmp: &mut Temporaries<N>,
    rng: &mut R,
) {
    for column in 0..4 {
        sp_box(state, column, tmp, rng);
    }
}

/// Apply the masked Gimli permutation in place.
///
/// Consumes `288 * N * (N - 1) / 2` random words: three masked gates per column, four columns
/// per round, 24 rounds.
pub fn permute_masked<const N: usize, R: RngCore + CryptoRng>(
    state: &mut [MaskedU32<N>; 12],
    rng: &mut R,
) {
    let mut tmp = Temporaries::new();

    for round in (4..=ROUNDS).rev().step_by(4) {
        // SP-box, small swap, round constant.
        sp_layer(state, &mut tmp, rng);
        state.swap(0, 1);
        state.swap(2, 3);
        state[0].xor_const(ROUND_CONSTANT ^ round);

        // SP-box only.
        sp_layer(state, &mut tmp, rng);

        // SP-box, big swap.
        sp_layer(state, &mut tmp, rng);
        state.swap(0, 2);
        state.swap(1, 3);

        // SP-box only.
        sp_layer(state, &mut tmp, rng);
    }
}

/// Mask 12 plaintext words into `output`, drawing fresh shares for every lane.
pub fn mask_state<const N: usize, R: RngCore + CryptoRng>(
    output: &mut [MaskedU32<N>; 12],
    input: &[u32; 12],
    rng: &mut R,
) {
    for (lane, &word) in output.iter_mut().zip(input.iter()) {
        *lane = MaskedU32::input(word, rng);
    }
}

/// Recombine 12 masked lanes into plaintext words.
pub fn unmask_state<const N: usize>(output: &mut [u32; 12], input: &[MaskedU32<N>; 12]) {
    for (word, lane) in output.iter_mut().zip(input.iter()) {
        *word = lane.output();
    }
}

/// Masked Gimli state, wiped on drop.
#[derive(Clone)]
pub struct MaskedState<const N: usize = DEFAULT_SHARES> {
    lanes: [MaskedU32<N>; 12],
}

impl<const N: usize> MaskedState<N> {
    /// Mask a plaintext state.
    pub fn mask<R: RngCore + CryptoRng>(input: &[u32; 12], rng: &mut R) -> Self {
        let mut state = Self {
            lanes: [MaskedU32::zero(); 12],
        };
        mask_state(&mut state.lanes, input, rng);
        state
    }

    /// Apply the masked permutation.
    #[inline]
    pub fn permute<R: RngCore + CryptoRng>(&mut self, rng: &mut R) {
        permute_masked(&mut self.lanes, rng);
    }

    /// Recombine the lanes into a plaintext state.
    pub fn unmask(&self) -> [u32; 12] {
        let mut output = [0u32; 12];
        unmask_state(&mut output, &self.lanes);
        output
    }

    /// The masked lanes.
    pub const fn lanes(&self) -> &[MaskedU32<N>; 12] {
        &self.lanes
    }

    /// The masked lanes, mutably.
    pub fn lanes_mut(&mut self) -> &mut [MaskedU32<N>; 12] {
        &mut self.lanes
    }

    /// XOR public little-endian data (up to one rate block) into the first lanes.
    pub(crate) fn xor_block(&mut self, block: &[u8]) {
        for (lane, word) in self.lanes.iter_mut().zip(block.chunks_exact(4)) {
            lane.xor_const(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
        }
    }

    /// Flip the domain separation bit (last byte of the state).
    pub(crate) fn separate_domain(&mut self) {
        self.lanes[LAST_LANE].xor_const(0x0100_0000);
    }

    /// Unmask the rate lanes as little-endian bytes.
    pub(crate) fn rate_bytes(&self) -> [u8; RATE] {
        let mut out = [0u8; RATE];
        for (bytes, lane) in out.chunks_exact_mut(4).zip(self.lanes.iter()) {
            bytes.copy_from_slice(&lane.output().to_le_bytes());
        }
        out
    }
}

impl<const N: usize> Zeroize for MaskedState<N> {
    fn zeroize(&mut self) {
        self.lanes.zeroize();
    }
}

impl<const N: usize> Drop for MaskedState<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for MaskedState<N> {}

impl<const N: usize> fmt::Debug for MaskedState<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedState")
            .field("shares", &N)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
