//! Error types for URL signing, source encryption and verification
//!
//! Messages never carry secret material, IVs, ciphertext or signature
//! bytes. Variants that describe bad input name the *field*, not its value.

use thiserror::Error;

/// Errors produced while building, encrypting or verifying signed paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// Malformed hex or base64 input
    #[error("Invalid {field} encoding")]
    InvalidEncoding { field: &'static str },

    /// Any decryption failure, padding included
    #[error("Failed to decrypt source URL")]
    InvalidPadding,

    /// Recomputed signature does not match the one in the path
    #[error("Invalid signature")]
    SignatureMismatch,

    /// The signature segment looks like a processing option
    #[error("The signature appears to be a processing option; the signature segment must always be present")]
    MalformedSignature,

    /// Path could not be assembled or split
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Secret has the wrong length for its algorithm
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Signature size outside 1..=32
    #[error("Signature size should be within 1 and 32, got {0}")]
    InvalidSignatureSize(usize),

    /// Encrypted source requested but no encryption key configured
    #[error("Encrypted source URL requested but no encryption key is configured")]
    MissingEncryptionKey,

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for signing operations
pub type SignResult<T> = std::result::Result<T, SignError>;

impl SignError {
    /// Maps errors to the HTTP status a proxy would answer with
    ///
    /// - SignatureMismatch, MalformedSignature → 403 (Forbidden)
    /// - InvalidPath, InvalidEncoding, InvalidPadding → 404 (Not Found)
    /// - key, size, config errors → 500 (Internal Server Error)
    pub fn to_http_status(&self) -> u16 {
        match self {
            SignError::SignatureMismatch | SignError::MalformedSignature => 403,

            SignError::InvalidPath(_)
            | SignError::InvalidEncoding { .. }
            | SignError::InvalidPadding => 404,

            SignError::InvalidKeyLength { .. }
            | SignError::InvalidSignatureSize(_)
            | SignError::MissingEncryptionKey
            | SignError::Config(_) => 500,
        }
    }

    pub fn invalid_encoding(field: &'static str) -> Self {
        SignError::InvalidEncoding { field }
    }

    pub fn invalid_path(reason: impl Into<String>) -> Self {
        SignError::InvalidPath(reason.into())
    }

    pub fn config(reason: impl Into<String>) -> Self {
        SignError::Config(reason.into())
    }
}
