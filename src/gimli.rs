//! # Gimli permutation implementation
//!
//! The Gimli permutation operates on a 384-bit state as 12 32-bit words. This is the unmasked
//! permutation; the masked variant in `gimli_masked` follows the same round schedule.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of rounds in Gimli permutation.
pub(crate) const ROUNDS: u32 = 24;

/// Round constant in the permutation.
pub(crate) const ROUND_CONSTANT: u32 = 0x9e37_7900;

/// Gimli state: 12 u32 words (384 bits).
///
/// The byte views assume a little-endian host, where word `i` covers bytes `4 * i..4 * i + 4`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct State(pub(crate) [u32; 12]);

impl State {
    /// Create a new state.
    #[inline(always)]
    pub const fn new() -> Self {
        Self([0; 12])
    }

    /// Get a mutable view of the state as bytes.
    #[inline(always)]
    pub const fn as_bytes_mut(&mut self) -> &mut [u8; 48] {
        // SAFETY: `[u32; 12]` and `[u8; 48]` have the same size, the source alignment is
        // stricter, and every bit pattern is valid for both.
        unsafe { core::mem::transmute(&mut self.0) }
    }

    /// Get an immutable view of the state as bytes.
    #[inline(always)]
    pub const fn as_bytes(&self) -> &[u8; 48] {
        // SAFETY: See `as_bytes_mut`.
        unsafe { core::mem::transmute(&self.0) }
    }
}

/// SP-box on one column.
#[inline(always)]
fn sp_box(state: &mut [u32; 12], column: usize) {
    let x = state[column].rotate_left(24);
    let y = state[4 + column].rotate_left(9);
    let z = state[8 + column];

    state[8 + column] = x ^ (z << 1) ^ ((y & z) << 2);
    state[4 + column] = y ^ x ^ ((x | z) << 1);
    state[column] = z ^ y ^ ((x & y) << 3);
}

/// Apply the Gimli permutation to 12 words in host order.
pub fn permute(state: &mut [u32; 12]) {
    for round in (1..=ROUNDS).rev() {
        for column in 0..4 {
            sp_box(state, column);
        }

        // Small swap: rounds 24, 20, 16, 12, 8, 4.
        if round & 3 == 0 {
            state.swap(0, 1);
            state.swap(2, 3);
        }

        // Big swap: rounds 22, 18, 14, 10, 6, 2.
        if round & 3 == 2 {
            state.swap(0, 2);
            state.swap(1, 3);
        }

        // Add round constant: only on round multiples of 4.
        if round & 3 == 0 {
            state[0] ^= ROUND_CONSTANT | round;
        }
    }
}

/// Apply the Gimli permutation to the state.
#[inline(always)]
pub(crate) fn gimli(state: &mut State) {
    permute(&mut state.0);
}
