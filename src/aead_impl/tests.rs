extern crate std;
use super::*;
use std::vec::Vec;

pub(crate) fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

/// Entry of `LWC_AEAD_KAT_256_128.txt` for `aead/gimli24v1`.
///
/// Key is `00..1f`, nonce `00..0f`; plaintext and associated data are `00, 01, ..` of the given
/// lengths.
pub(crate) struct TestVector {
    pub(crate) count: usize,
    pub(crate) plaintext_len: usize,
    pub(crate) associated_data_len: usize,
    pub(crate) ciphertext_and_tag: &'static str,
}

impl TestVector {
    pub(crate) fn key(&self) -> [u8; KEY_SIZE] {
        core::array::from_fn(|i| i as u8)
    }

    pub(crate) fn nonce(&self) -> [u8; NONCE_SIZE] {
        core::array::from_fn(|i| i as u8)
    }

    pub(crate) fn plaintext(&self) -> Vec<u8> {
        (0..self.plaintext_len).map(|i| i as u8).collect()
    }

    pub(crate) fn associated_data(&self) -> Vec<u8> {
        (0..self.associated_data_len).map(|i| i as u8).collect()
    }

    pub(crate) fn expected(&self) -> Vec<u8> {
        hex_to_bytes(self.ciphertext_and_tag)
    }
}

pub(crate) const TEST_VECTORS: [TestVector; 6] = [
    TestVector {
        count: 1,
        plaintext_len: 0,
        associated_data_len: 0,
        ciphertext_and_tag: "14DA9BB7120BF58B985A8E00FDEBA15B",
    },
    TestVector {
        count: 2,
        plaintext_len: 0,
        associated_data_len: 1,
        ciphertext_and_tag: "E8D50453F84B575412327D7C0302D8D3",
    },
    TestVector {
        count: 17,
        plaintext_len: 0,
        associated_data_len: 16,
        ciphertext_and_tag: "47176D99169B4555B67BD18282E4A491",
    },
    TestVector {
        count: 34,
        plaintext_len: 1,
        associated_data_len: 0,
        ciphertext_and_tag: "7F80492C317B1CD58A1EDC3A0D3E9876FC",
    },
    TestVector {
        count: 35,
        plaintext_len: 1,
        associated_data_len: 1,
        ciphertext_and_tag: "D44BFEBDB1382A0FAC73BC9CDD0657C762",
    },
    TestVector {
        count: 574,
        plaintext_len: 17,
        associated_data_len: 12,
        ciphertext_and_tag: "2F1F1BFE0636C05C1A15FD9FDE3F2BE42E169ACAF1C7AFD2E2E578C811CF0EF9E2",
    },
];

#[test]
fn test_official_vectors() {
    for vector in &TEST_VECTORS {
        let expected = vector.expected();
        assert_eq!(
            expected.len(),
            vector.plaintext_len + TAG_SIZE,
            "Count {}: Ciphertext+tag length mismatch",
            vector.count
        );

        let mut buffer = vector.plaintext();
        let tag = encrypt_in_place(
            &vector.key(),
            &vector.nonce(),
            &vector.associated_data(),
            &mut buffer,
        );

        assert_eq!(
            &buffer[..],
            &expected[..vector.plaintext_len],
            "Count {}: Ciphertext mismatch",
            vector.count
        );
        assert_eq!(
            &tag[..],
            &expected[vector.plaintext_len..],
            "Count {}: Tag mismatch",
            vector.count
        );

        decrypt_in_place(
            &vector.key(),
            &vector.nonce(),
            &vector.associated_data(),
            &mut buffer,
            &tag,
        )
        .unwrap_or_else(|_| panic!("Count {}: Decryption failed", vector.count));
        assert_eq!(buffer, vector.plaintext(), "Count {}: Plaintext mismatch", vector.count);
    }
}

#[test]
fn test_aead_roundtrip() {
    let key = [1u8; KEY_SIZE];
    let nonce = [2u8; NONCE_SIZE];
    let plaintext = b"Hello, Gimli AEAD!";
    let associated_data = b"associated data";

    // Encrypt
    let mut buffer = *plaintext;
    let tag = encrypt_in_place(&key, &nonce, associated_data, &mut buffer);

    // Decrypt
    decrypt_in_place(&key, &nonce, associated_data, &mut buffer, &tag)
        .expect("Decryption should succeed");

    assert_eq!(&buffer, plaintext);
}

#[test]
fn test_in_place_roundtrip() {
    let key = [42u8; KEY_SIZE];
    let nonce = [99u8; NONCE_SIZE];
    let original_data = b"In-place encryption!";
    let associated_data = b"metadata";

    let mut buffer = [0u8; 20];
    buffer.copy_from_slice(original_data);

    // Encrypt in-place
    let tag = encrypt_in_place(&key, &nonce, associated_data, &mut buffer);

    // Buffer should now contain ciphertext (different from plaintext)
    assert_ne!(&buffer[..], original_data);

    // Decrypt in-place
    decrypt_in_place(&key, &nonce, associated_data, &mut buffer, &tag)
        .expect("Decryption should succeed");

    // Should recover original data
    assert_eq!(&buffer[..], original_data);
}

#[test]
fn test_block_boundaries() {
    let key: [u8; KEY_SIZE] = core::array::from_fn(|i| i as u8);
    let nonce: [u8; NONCE_SIZE] = core::array::from_fn(|i| 0xf0 ^ i as u8);
    let data: [u8; 48] = core::array::from_fn(|i| (i * 7) as u8);

    for len in [0, 1, 15, 16, 17, 31, 32, 33, 48] {
        let mut buffer = data;
        let tag = encrypt_in_place(&key, &nonce, &data[..len], &mut buffer[..len]);
        decrypt_in_place(&key, &nonce, &data[..len], &mut buffer[..len], &tag)
            .unwrap_or_else(|_| panic!("length {len}: decryption failed"));
        assert_eq!(buffer, data, "length {len}: plaintext mismatch");
    }
}

#[test]
fn test_authentication_failed() {
    let key = [1u8; KEY_SIZE];
    let nonce = [2u8; NONCE_SIZE];
    let plaintext = b"Hello, Gimli!";
    let associated_data = b"test";

    let mut buffer = *plaintext;
    let tag = encrypt_in_place(&key, &nonce, associated_data, &mut buffer);

    // Modify the tag to make authentication fail
    let mut bad_tag = tag;
    bad_tag[0] ^= 1;

    let result = decrypt_in_place(&key, &nonce, associated_data, &mut buffer, &bad_tag);

    assert_eq!(result, Err(AuthenticationFailed));

    // The unauthenticated plaintext is not handed out.
    assert_eq!(buffer, [0u8; 13]);
}

#[test]
fn test_modified_associated_data() {
    let key = [3u8; KEY_SIZE];
    let nonce = [4u8; NONCE_SIZE];

    let mut buffer = *b"payload";
    let tag = encrypt_in_place(&key, &nonce, b"header", &mut buffer);

    let result = decrypt_in_place(&key, &nonce, b"headex", &mut buffer, &tag);
    assert_eq!(result, Err(AuthenticationFailed));
}
