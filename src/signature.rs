//! URL signing with HMAC-SHA256
//!
//! The signature is computed as:
//! ```text
//! signature = HMAC-SHA256(key, salt || path)[..size]
//! signed    = "/" + base64url(signature) + path
//! ```
//!
//! `size` defaults to the full 32-byte digest. A shorter size gives shorter
//! URLs at the cost of forgery resistance: an 8-byte signature can be
//! brute-forced with roughly 2^64 attempts instead of 2^256. It is never
//! applied unless explicitly configured.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::codec::encode_base64url;
use crate::error::{SignError, SignResult};
use crate::secret::KeyPair;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Length of an untruncated HMAC-SHA256 digest
pub const FULL_SIGNATURE_SIZE: usize = 32;

/// Number of digest bytes kept in a signature, always within 1..=32
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureSize(usize);

impl SignatureSize {
    pub const FULL: SignatureSize = SignatureSize(FULL_SIGNATURE_SIZE);

    pub fn new(bytes: usize) -> SignResult<Self> {
        if (1..=FULL_SIGNATURE_SIZE).contains(&bytes) {
            Ok(Self(bytes))
        } else {
            Err(SignError::InvalidSignatureSize(bytes))
        }
    }

    pub fn bytes(&self) -> usize {
        self.0
    }

    pub fn is_truncated(&self) -> bool {
        self.0 < FULL_SIGNATURE_SIZE
    }

    /// Length of the unpadded base64url rendering
    pub fn encoded_len(&self) -> usize {
        (self.0 * 4 + 2) / 3
    }
}

impl Default for SignatureSize {
    fn default() -> Self {
        Self::FULL
    }
}

/// Raw signature bytes; `Display` renders base64url
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep the first `size` bytes
    pub fn truncated(mut self, size: SignatureSize) -> Self {
        self.0.truncate(size.bytes());
        self
    }

    pub fn to_base64url(&self) -> String {
        encode_base64url(&self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64url())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({} bytes)", self.0.len())
    }
}

/// HMAC state primed with `salt || path`
pub(crate) fn keyed_mac(key: &[u8], salt: &[u8], path: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(salt);
    mac.update(path.as_bytes());
    mac
}

/// Full-length signature over `salt || path`
pub fn sign(salt: &[u8], path: &str, key: &[u8]) -> Signature {
    Signature(keyed_mac(key, salt, path).finalize().into_bytes().to_vec())
}

/// `"/" + base64url(signature) + path`, truncated when `truncation` is set
pub fn build_signed_path(
    salt: &[u8],
    path: &str,
    key: &[u8],
    truncation: Option<SignatureSize>,
) -> String {
    let signature = sign(salt, path, key).truncated(truncation.unwrap_or_default());
    format!("/{}{}", signature, path)
}

/// Signs paths with a single key pair
#[derive(Debug, Clone)]
pub struct Signer {
    pair: KeyPair,
    size: SignatureSize,
}

impl Signer {
    /// Signer producing full-length signatures
    pub fn new(pair: KeyPair) -> Self {
        Self {
            pair,
            size: SignatureSize::FULL,
        }
    }

    /// Truncate signatures to `size` bytes
    pub fn with_size(mut self, size: SignatureSize) -> Self {
        self.size = size;
        self
    }

    pub fn signature_size(&self) -> SignatureSize {
        self.size
    }

    pub fn sign(&self, path: &str) -> Signature {
        sign(self.pair.salt.as_bytes(), path, self.pair.key.as_bytes()).truncated(self.size)
    }

    /// Prepend the signature segment to `path`
    pub fn sign_path(&self, path: &str) -> String {
        let signed = format!("/{}{}", self.sign(path), path);
        tracing::debug!(
            path_len = path.len(),
            signature_size = self.size.bytes(),
            "Signed path"
        );
        signed
    }
}
