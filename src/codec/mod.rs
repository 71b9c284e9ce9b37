//! Text codecs for secret material and path segments

pub mod base64url;
pub mod hex;

pub use self::base64url::{decode_base64url, encode_base64url};
pub use self::hex::{decode_hex, encode_hex};
