// Encryption tests: AES-256-CBC source URLs with PKCS#7 padding
//
// Blob layout is IV (16 bytes) || ciphertext, rendered as base64url in
// `enc/` source segments. Every decryption failure maps to the same error.

use imgsign::codec::{decode_base64url, encode_base64url};
use imgsign::encryption::{self, SourceCipher, BLOCK_SIZE};
use imgsign::error::SignError;
use imgsign::secret::Secret;
use proptest::prelude::*;
use rstest::rstest;

const KEY: &str = "1eb5b0e971ad7f45324c1bb15c947cb207c43152fa5c6c7f35c4f36e0c18e0f1";

fn key() -> Secret {
    Secret::from_hex(KEY, "encryption key").unwrap()
}

fn cipher() -> SourceCipher {
    SourceCipher::new(&key()).unwrap()
}

fn iv() -> [u8; BLOCK_SIZE] {
    let mut iv = [0u8; BLOCK_SIZE];
    for (i, byte) in iv.iter_mut().enumerate() {
        *byte = i as u8;
    }
    iv
}

proptest! {
    /// Test: decrypt(encrypt(p)) == p for any plaintext
    #[test]
    fn encryption_round_trips(data in proptest::collection::vec(any::<u8>(), 0..300)) {
        let blob = cipher().encrypt(&data);
        prop_assert_eq!(blob.len() % BLOCK_SIZE, 0);
        prop_assert!(blob.len() >= data.len() + BLOCK_SIZE + 1);
        prop_assert_eq!(cipher().decrypt(&blob).unwrap(), data);
    }

    /// Test: flipping any ciphertext bit never yields the original plaintext
    #[test]
    fn tampered_blob_never_decrypts_to_original(idx in any::<prop::sample::Index>()) {
        let url = b"http://img.example.com/pretty/image.jpg";
        let mut blob = cipher().encrypt_with_iv(&iv(), url);
        let pos = idx.index(blob.len());
        blob[pos] ^= 0x80;
        if let Ok(decrypted) = cipher().decrypt(&blob) {
            prop_assert_ne!(decrypted, url.to_vec());
        }
    }
}

/// Test: known answers with the IV 00 01 .. 0f
#[rstest]
#[case(
    "http://img.example.com/pretty/image.jpg",
    "AAECAwQFBgcICQoLDA0OD3aaI6kd15b5bLmZDYvy6wbk983mDqGTSAM2eEJghVjEoPQzJcSASge0lCMv-gcceQ"
)]
#[case(
    "http://example.com/a.png",
    "AAECAwQFBgcICQoLDA0OD-oy5j6HLY8zJQO44B4rYFbppyYEkvVy7NSSV6qnwQuv"
)]
fn test_known_answers(#[case] url: &str, #[case] expected: &str) {
    let blob = cipher().encrypt_with_iv(&iv(), url.as_bytes());
    assert_eq!(encode_base64url(&blob), expected);

    let decoded = decode_base64url(expected, "source URL").unwrap();
    assert_eq!(cipher().decrypt(&decoded).unwrap(), url.as_bytes());
}

#[rstest]
#[case(0)]
#[case(15)]
#[case(16)]
#[case(31)]
#[case(33)]
fn test_short_or_unaligned_blobs_rejected(#[case] len: usize) {
    assert_eq!(cipher().decrypt(&vec![0u8; len]), Err(SignError::InvalidPadding));
}

/// Test: the wrong key fails with the same generic error as bad padding
#[test]
fn test_wrong_key_rejected() {
    let blob = cipher().encrypt_with_iv(&iv(), b"http://img.example.com/pretty/image.jpg");
    let other = SourceCipher::new(&Secret::from_bytes(vec![0x11; 32])).unwrap();
    assert_eq!(other.decrypt(&blob), Err(SignError::InvalidPadding));
}

#[rstest]
#[case(16)]
#[case(24)]
#[case(31)]
#[case(33)]
fn test_key_must_be_32_bytes(#[case] len: usize) {
    let result = SourceCipher::new(&Secret::from_bytes(vec![0u8; len]));
    assert_eq!(
        result.err(),
        Some(SignError::InvalidKeyLength {
            expected: 32,
            actual: len
        })
    );
}

#[test]
fn test_free_functions() {
    let blob = encryption::encrypt(b"local:///a.png", &key()).unwrap();
    assert_eq!(encryption::decrypt(&blob, &key()).unwrap(), b"local:///a.png");
    assert!(encryption::encrypt(b"x", &Secret::from_bytes(vec![0u8; 8])).is_err());
}

#[test]
fn test_error_message_is_generic() {
    let err = cipher().decrypt(&[0u8; 32]).unwrap_err();
    assert_eq!(err.to_string(), "Failed to decrypt source URL");
}
