//! Immutable secret material
//!
//! Secrets are decoded from hex once at startup and never change
//! afterwards, so they can be shared across threads without locking.

use std::fmt;

use crate::codec::decode_hex;
use crate::error::SignResult;

/// Raw key or salt bytes
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Decode a hex-encoded secret; `field` names it in errors
    pub fn from_hex(hex: &str, field: &'static str) -> SignResult<Self> {
        decode_hex(hex.trim(), field).map(Self)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<redacted {} bytes>)", self.0.len())
    }
}

/// One HMAC key with its salt
///
/// The salt is mixed into the signed message, never into the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub key: Secret,
    pub salt: Secret,
}

impl KeyPair {
    pub fn new(key: Secret, salt: Secret) -> Self {
        Self { key, salt }
    }

    /// Decode a pair from hex strings
    pub fn from_hex(key: &str, salt: &str) -> SignResult<Self> {
        Ok(Self {
            key: Secret::from_hex(key, "key")?,
            salt: Secret::from_hex(salt, "salt")?,
        })
    }
}
