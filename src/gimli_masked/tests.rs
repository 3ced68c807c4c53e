extern crate std;
use super::*;
use crate::gimli::permute;
use rand::SeedableRng;
use rand::rngs::StdRng;

// Test vectors from https://gimli.cr.yp.to/impl.html for the permutation.
const INPUT: [u8; 48] = [
    0x00, 0x00, 0x00, 0x00, 0xba, 0x79, 0x37, 0x9e, 0x7a, 0xf3, 0x6e, 0x3c, 0x46, 0x6d, 0xa6, 0xda,
    0x24, 0xe7, 0xdd, 0x78, 0x1a, 0x61, 0x15, 0x17, 0x2e, 0xdb, 0x4c, 0xb5, 0x66, 0x55, 0x84, 0x53,
    0xc8, 0xcf, 0xbb, 0xf1, 0x5a, 0x4a, 0xf3, 0x8f, 0x22, 0xc5, 0x2a, 0x2e, 0x26, 0x40, 0x62, 0xcc,
];
const OUTPUT: [u8; 48] = [
    0x5a, 0xc8, 0x11, 0xba, 0x19, 0xd1, 0xba, 0x91, 0x80, 0xe8, 0x0c, 0x38, 0x68, 0x2c, 0x4c, 0xd2,
    0xea, 0xff, 0xce, 0x3e, 0x1c, 0x92, 0x7a, 0x27, 0xbd, 0xa0, 0x73, 0x4f, 0xd8, 0x9c, 0x5a, 0xda,
    0xf0, 0x73, 0xb6, 0x84, 0xf7, 0x2f, 0xe5, 0x34, 0x49, 0xef, 0x2b, 0x9e, 0xd6, 0xb8, 0x1b, 0xf4,
];

fn load_words(bytes: &[u8; 48]) -> [u32; 12] {
    core::array::from_fn(|i| {
        u32::from_le_bytes([bytes[4 * i], bytes[4 * i + 1], bytes[4 * i + 2], bytes[4 * i + 3]])
    })
}

fn store_words(words: &[u32; 12]) -> [u8; 48] {
    let mut out = [0u8; 48];
    for (bytes, word) in out.chunks_exact_mut(4).zip(words.iter()) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
    out
}

struct CountingRng<R> {
    inner: R,
    words: usize,
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.words += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.words += 2;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl<R: CryptoRng> CryptoRng for CountingRng<R> {}

macro_rules! all_shares {
    ($check:ident) => {
        $check::<2>();
        $check::<3>();
        $check::<4>();
        $check::<5>();
        $check::<6>();
    };
}

fn check_test_vector<const N: usize>() {
    let mut rng = StdRng::seed_from_u64(N as u64);
    let mut state = [MaskedU32::<N>::zero(); 12];
    mask_state(&mut state, &load_words(&INPUT), &mut rng);

    permute_masked(&mut state, &mut rng);

    let mut words = [0u32; 12];
    unmask_state(&mut words, &state);
    assert_eq!(store_words(&words), OUTPUT);

    // Same result through the unmasked permutation.
    let mut plain = load_words(&INPUT);
    permute(&mut plain);
    assert_eq!(words, plain);
}

#[test]
fn test_masked_permutation_vector() {
    all_shares!(check_test_vector);
}

fn check_matches_unmasked<const N: usize>() {
    let mut rng = StdRng::seed_from_u64(100 + N as u64);
    for _ in 0..16 {
        let input: [u32; 12] = core::array::from_fn(|_| rng.next_u32());

        let mut masked = MaskedState::<N>::mask(&input, &mut rng);
        masked.permute(&mut rng);

        let mut plain = input;
        permute(&mut plain);

        assert_eq!(masked.unmask(), plain);
    }
}

#[test]
fn test_masked_permutation_matches_unmasked() {
    all_shares!(check_matches_unmasked);
}

fn check_mask_unmask<const N: usize>() {
    let mut rng = StdRng::seed_from_u64(200 + N as u64);
    for _ in 0..128 {
        let input: [u32; 12] = core::array::from_fn(|_| rng.next_u32());
        let masked = MaskedState::<N>::mask(&input, &mut rng);
        assert_eq!(masked.unmask(), input);
    }
}

#[test]
fn test_mask_unmask_round_trip() {
    all_shares!(check_mask_unmask);
}

#[test]
fn test_independent_of_share_randomness() {
    let input = load_words(&INPUT);
    let mut first = StdRng::seed_from_u64(1);
    let mut second = StdRng::seed_from_u64(2);

    let mut a = MaskedState::<4>::mask(&input, &mut first);
    let mut b = MaskedState::<4>::mask(&input, &mut second);
    assert_ne!(a.lanes()[0].shares(), b.lanes()[0].shares());

    a.permute(&mut first);
    b.permute(&mut second);

    assert_ne!(a.lanes()[5].shares(), b.lanes()[5].shares());
    assert_eq!(a.unmask(), b.unmask());
    assert_eq!(store_words(&a.unmask()), OUTPUT);
}

fn check_randomness_consumption<const N: usize>() {
    let mut rng = CountingRng {
        inner: StdRng::seed_from_u64(300 + N as u64),
        words: 0,
    };
    let mut state = MaskedState::<N>::mask(&[0; 12], &mut rng);
    assert_eq!(rng.words, 12 * (N - 1));

    rng.words = 0;
    state.permute(&mut rng);
    assert_eq!(rng.words, 24 * 4 * 3 * N * (N - 1) / 2);
}

#[test]
fn test_randomness_consumption() {
    all_shares!(check_randomness_consumption);
}

#[test]
fn test_block_helpers() {
    let mut rng = StdRng::seed_from_u64(400);
    let mut state = MaskedState::<3>::mask(&[0; 12], &mut rng);

    let block: [u8; 16] = core::array::from_fn(|i| i as u8 + 1);
    state.xor_block(&block);
    state.separate_domain();

    assert_eq!(state.rate_bytes(), block);
    let words = state.unmask();
    assert_eq!(words[0], 0x0403_0201);
    assert_eq!(words[11], 0x0100_0000);
    assert_eq!(words[4..11], [0; 7]);
}

#[test]
fn test_lanes_mut_reshare() {
    let mut rng = StdRng::seed_from_u64(600);
    let mut state = MaskedState::<3>::mask(&load_words(&INPUT), &mut rng);

    for lane in state.lanes_mut().iter_mut() {
        let before = *lane.shares();
        *lane = MaskedU32::input(lane.output(), &mut rng);
        assert_ne!(lane.shares(), &before);
    }

    state.permute(&mut rng);
    assert_eq!(store_words(&state.unmask()), OUTPUT);
}

#[test]
fn test_zeroize() {
    let mut rng = StdRng::seed_from_u64(500);
    let mut state = MaskedState::<2>::mask(&load_words(&INPUT), &mut rng);
    state.zeroize();
    assert!(state.lanes().iter().all(|lane| lane.shares() == &[0; 2]));
}
