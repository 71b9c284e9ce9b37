//! Source reference encoding
//!
//! Three wire forms are supported:
//!
//! ```text
//! plain/http://example.com/image.jpg@png
//! aHR0cDovL2V4YW1wbGUu/Y29tL2ltYWdlLmpwZw.png     (base64url, optionally chunked)
//! enc/<base64url(iv || ciphertext)>.png
//! ```
//!
//! The variant is always chosen by the caller. Chunking splits the base64
//! text with `/` for readability only; segments are concatenated again
//! before decoding.

use std::num::NonZeroUsize;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::codec::{decode_base64url, encode_base64url};
use crate::encryption::SourceCipher;
use crate::error::{SignError, SignResult};

/// Default chunk width for readable base64 sources
pub const DEFAULT_CHUNK_WIDTH: usize = 16;

const PLAIN_MARKER: &str = "plain";
const ENC_MARKER: &str = "enc";

/// Characters percent-escaped in plain sources; `@` is the extension separator
const PLAIN_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'?')
    .add(b'@');

/// Which wire form a source URL takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    Plain,
    #[default]
    Base64,
    Encrypted,
}

impl SourceEncoding {
    /// Wrap `url` in the matching reference; `chunk_width` applies to base64 only
    pub fn reference(self, url: impl Into<String>, chunk_width: Option<usize>) -> SourceReference {
        match self {
            SourceEncoding::Plain => SourceReference::plain(url),
            SourceEncoding::Base64 => match chunk_width {
                Some(width) => SourceReference::base64_chunked(url, width),
                None => SourceReference::base64(url),
            },
            SourceEncoding::Encrypted => SourceReference::encrypted(url),
        }
    }
}

/// The source image URL in one of its wire forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceReference {
    Plain(String),
    Base64 {
        url: String,
        chunk_width: Option<NonZeroUsize>,
    },
    Encrypted(String),
}

impl SourceReference {
    pub fn plain(url: impl Into<String>) -> Self {
        SourceReference::Plain(url.into())
    }

    pub fn base64(url: impl Into<String>) -> Self {
        SourceReference::Base64 {
            url: url.into(),
            chunk_width: None,
        }
    }

    /// Base64 split into `width`-character segments; `0` disables chunking
    pub fn base64_chunked(url: impl Into<String>, width: usize) -> Self {
        SourceReference::Base64 {
            url: url.into(),
            chunk_width: NonZeroUsize::new(width),
        }
    }

    pub fn encrypted(url: impl Into<String>) -> Self {
        SourceReference::Encrypted(url.into())
    }

    pub fn url(&self) -> &str {
        match self {
            SourceReference::Plain(url)
            | SourceReference::Base64 { url, .. }
            | SourceReference::Encrypted(url) => url,
        }
    }

    pub fn encoding(&self) -> SourceEncoding {
        match self {
            SourceReference::Plain(_) => SourceEncoding::Plain,
            SourceReference::Base64 { .. } => SourceEncoding::Base64,
            SourceReference::Encrypted(_) => SourceEncoding::Encrypted,
        }
    }

    /// Character separating the source from an output extension
    pub fn extension_separator(&self) -> char {
        match self {
            SourceReference::Plain(_) => '@',
            SourceReference::Base64 { .. } | SourceReference::Encrypted(_) => '.',
        }
    }

    /// Render the source segment(s), without extension
    ///
    /// `cipher` is only consulted for the encrypted form. Plain URLs are
    /// percent-escaped where they would collide with path syntax.
    pub fn encode(&self, cipher: Option<&SourceCipher>) -> SignResult<String> {
        if self.url().is_empty() {
            return Err(SignError::invalid_path("image URL is empty"));
        }
        match self {
            SourceReference::Plain(url) => Ok(format!(
                "{}/{}",
                PLAIN_MARKER,
                utf8_percent_encode(url, PLAIN_ESCAPE)
            )),
            SourceReference::Base64 { url, chunk_width } => {
                let encoded = encode_base64url(url.as_bytes());
                Ok(match chunk_width {
                    Some(width) => chunk(&encoded, width.get()),
                    None => encoded,
                })
            }
            SourceReference::Encrypted(url) => {
                let cipher = cipher.ok_or(SignError::MissingEncryptionKey)?;
                let blob = cipher.encrypt(url.as_bytes());
                Ok(format!("{}/{}", ENC_MARKER, encode_base64url(&blob)))
            }
        }
    }
}

fn chunk(encoded: &str, width: usize) -> String {
    let mut out = String::with_capacity(encoded.len() + encoded.len() / width);
    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('/');
        }
        out.push(ch);
    }
    out
}

/// A source URL recovered from path segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSource {
    pub url: String,
    pub extension: Option<String>,
    pub encoding: SourceEncoding,
}

/// Decode the source segments at the tail of a path
///
/// `segments` starts at the source: `["plain", "http:", "", "host", ...]`,
/// `["enc", "<blob>.png"]` or the base64 chunks.
pub fn decode_source(
    segments: &[&str],
    cipher: Option<&SourceCipher>,
) -> SignResult<DecodedSource> {
    match segments {
        [] => Err(SignError::invalid_path("image URL is empty")),
        [marker, rest @ ..] if *marker == ENC_MARKER && !rest.is_empty() => {
            let (encoded, extension) = split_extension(&rest.join("/"), '.')?;
            let blob = decode_base64url(&encoded, "source URL")?;
            let cipher = cipher.ok_or(SignError::MissingEncryptionKey)?;
            let decrypted = cipher.decrypt(&blob)?;
            let url = String::from_utf8(decrypted).map_err(|_| SignError::InvalidPadding)?;
            Ok(DecodedSource {
                url,
                extension,
                encoding: SourceEncoding::Encrypted,
            })
        }
        [marker, rest @ ..] if *marker == PLAIN_MARKER && !rest.is_empty() => {
            let (escaped, extension) = split_extension(&rest.join("/"), '@')?;
            let url = percent_decode_str(&escaped)
                .decode_utf8()
                .map_err(|_| SignError::invalid_encoding("source URL"))?
                .into_owned();
            Ok(DecodedSource {
                url,
                extension,
                encoding: SourceEncoding::Plain,
            })
        }
        chunks => {
            let (encoded, extension) = split_extension(&chunks.concat(), '.')?;
            let bytes = decode_base64url(&encoded, "source URL")?;
            let url =
                String::from_utf8(bytes).map_err(|_| SignError::invalid_encoding("source URL"))?;
            Ok(DecodedSource {
                url,
                extension,
                encoding: SourceEncoding::Base64,
            })
        }
    }
}

fn split_extension(joined: &str, separator: char) -> SignResult<(String, Option<String>)> {
    let mut parts = joined.split(separator);
    let body = parts.next().unwrap_or_default();
    let extension = parts.next();

    if parts.next().is_some() {
        return Err(SignError::invalid_path("multiple formats are specified"));
    }
    if body.is_empty() {
        return Err(SignError::invalid_path("image URL is empty"));
    }

    let extension = extension.filter(|ext| !ext.is_empty()).map(str::to_string);
    Ok((body.to_string(), extension))
}
