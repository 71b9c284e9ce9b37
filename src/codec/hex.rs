//! Hex codec for key and salt material

use crate::error::{SignError, SignResult};

/// Decode an even-length hex string (either case) into bytes
///
/// `field` names the input in the error ("key", "salt") so the
/// offending value itself never appears in messages or logs.
pub fn decode_hex(input: &str, field: &'static str) -> SignResult<Vec<u8>> {
    hex::decode(input).map_err(|_| SignError::invalid_encoding(field))
}

/// Lowercase hex rendering
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
