// Signature tests: HMAC-SHA256 over salt || path, truncation and signed path layout

use imgsign::error::SignError;
use imgsign::secret::KeyPair;
use imgsign::signature::{build_signed_path, sign, SignatureSize, Signer};
use proptest::prelude::*;
use rstest::rstest;

const KEY: &str = "943b421c9eb07c830af81030552c86009268de4e532ba2ee2eab8247c6da0881";
const SALT: &str = "520f986b998545b4785e0defbc4f3c1203f22de2374a3d53cb7a7fe9fea309c5";
const PATH: &str = "/rs:fit:300:300/plain/http://img.example.com/pretty/image.jpg";

fn pair() -> KeyPair {
    KeyPair::from_hex(KEY, SALT).unwrap()
}

fn bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 1..80)
}

proptest! {
    /// Test: signing is deterministic for identical inputs
    #[test]
    fn sign_is_deterministic(key in bytes(), salt in bytes(), path in "/[ -~]{0,120}") {
        prop_assert_eq!(sign(&salt, &path, &key), sign(&salt, &path, &key));
    }

    /// Test: changing one byte of the path changes the signature
    #[test]
    fn path_change_changes_signature(
        path in "/[a-z0-9:/]{1,80}",
        idx in any::<prop::sample::Index>(),
    ) {
        let pos = idx.index(path.len());
        let mut tampered = path.clone().into_bytes();
        tampered[pos] = if tampered[pos] == b'x' { b'y' } else { b'x' };
        let tampered = String::from_utf8(tampered).unwrap();

        let pair = pair();
        prop_assert_ne!(
            sign(pair.salt.as_bytes(), &path, pair.key.as_bytes()),
            sign(pair.salt.as_bytes(), &tampered, pair.key.as_bytes())
        );
    }

    /// Test: flipping one bit of the key or the salt changes the signature
    #[test]
    fn key_or_salt_change_changes_signature(
        key in bytes(),
        salt in bytes(),
        idx in any::<prop::sample::Index>(),
    ) {
        let original = sign(&salt, PATH, &key);

        let mut other_key = key.clone();
        let pos = idx.index(other_key.len());
        other_key[pos] ^= 0x01;
        prop_assert_ne!(&original, &sign(&salt, PATH, &other_key));

        let mut other_salt = salt.clone();
        let pos = idx.index(other_salt.len());
        other_salt[pos] ^= 0x01;
        prop_assert_ne!(&original, &sign(&other_salt, PATH, &key));
    }

    /// Test: a truncated signature is a prefix of the full one
    #[test]
    fn truncation_is_prefix(size in 1usize..=32, path in "/[ -~]{0,60}") {
        let full = Signer::new(pair()).sign(&path);
        let truncated = Signer::new(pair())
            .with_size(SignatureSize::new(size).unwrap())
            .sign(&path);
        prop_assert_eq!(truncated.len(), size);
        prop_assert_eq!(truncated.as_bytes(), &full.as_bytes()[..size]);
    }
}

/// Test: reference vectors for the plain and legacy path layouts
#[rstest]
#[case(PATH, "m3k5QADfcKPDj-SDI2AIogZbC3FlAXszuwhtWXYqavc")]
#[case(
    "/fill/300/300/no/1/aHR0cDovL2ltZy5leGFtcGxlLmNvbS9wcmV0dHkvaW1hZ2UuanBn.png",
    "_PQ4ytCQMMp-1w1m_vP6g8Qb-Q7yF9mwghf6PddqxLw"
)]
#[case(
    "/rs:auto:100:80:0:0/dpr:2/aHR0cDovL2ltZy5leGFtcGxlLmNvbS9wcmV0dHkvaW1hZ2UuanBn.webp",
    "h7ZtZbDPImGGiiBNdCh2xYQ8I2XlMecX0WI54l9u1fk"
)]
fn test_reference_vectors(#[case] path: &str, #[case] expected: &str) {
    let pair = pair();
    assert_eq!(
        sign(pair.salt.as_bytes(), path, pair.key.as_bytes()).to_base64url(),
        expected
    );
    assert_eq!(
        build_signed_path(pair.salt.as_bytes(), path, pair.key.as_bytes(), None),
        format!("/{}{}", expected, path)
    );
}

/// Test: encoded length follows ceil(n*4/3)
#[rstest]
#[case(1, 2)]
#[case(8, 11)]
#[case(16, 22)]
#[case(32, 43)]
fn test_encoded_length(#[case] size: usize, #[case] chars: usize) {
    let size = SignatureSize::new(size).unwrap();
    assert_eq!(size.encoded_len(), chars);
    assert_eq!(Signer::new(pair()).with_size(size).sign(PATH).to_string().len(), chars);
}

#[rstest]
#[case(0)]
#[case(33)]
#[case(64)]
fn test_signature_size_bounds(#[case] size: usize) {
    assert_eq!(SignatureSize::new(size), Err(SignError::InvalidSignatureSize(size)));
}

#[test]
fn test_truncated_signed_path() {
    let pair = pair();
    let signed = build_signed_path(
        pair.salt.as_bytes(),
        PATH,
        pair.key.as_bytes(),
        Some(SignatureSize::new(8).unwrap()),
    );
    assert_eq!(signed, format!("/m3k5QADfcKM{}", PATH));
}

#[test]
fn test_signature_debug_hides_bytes() {
    let signature = Signer::new(pair()).sign(PATH);
    let rendered = format!("{:?}", signature);
    assert!(!rendered.contains("m3k5QADfcKP"));
}
