//! Unpadded URL-safe base64
//!
//! Encoding always strips `=`. Decoding accepts input with or without
//! trailing padding, but never more `=` than completes the last quad.
//! Anything outside the URL-safe alphabet (including `+` and `/`) is
//! rejected.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{SignError, SignResult};

/// URL-safe decoder accepting canonical padding or none
const URL_SAFE_OPTIONAL_PAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64url encode (URL-safe, no padding)
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Base64url decode, tolerating canonical trailing `=`
pub fn decode_base64url(input: &str, field: &'static str) -> SignResult<Vec<u8>> {
    URL_SAFE_OPTIONAL_PAD
        .decode(input)
        .map_err(|_| SignError::invalid_encoding(field))
}
