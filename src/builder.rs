//! Signed URL path construction
//!
//! [`UrlBuilder`] ties options, source encoding, encryption and signing
//! together:
//!
//! ```text
//! /<signature>/<modifier>/.../<source>[.<ext>]
//! ```

use crate::config::Config;
use crate::encryption::SourceCipher;
use crate::error::SignResult;
use crate::options::ProcessingOptions;
use crate::path::{Path, PathBuilder};
use crate::signature::Signer;
use crate::source::SourceEncoding;

/// Token emitted in place of a signature when no signer is configured
pub const INSECURE_SIGNATURE: &str = "insecure";

#[derive(Debug, Clone, Default)]
pub struct UrlBuilder {
    signer: Option<Signer>,
    cipher: Option<SourceCipher>,
    encoding: SourceEncoding,
    chunk_width: Option<usize>,
}

impl UrlBuilder {
    /// Unsigned builder with unchunked base64 sources
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signer(mut self, signer: Signer) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_cipher(mut self, cipher: SourceCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_chunk_width(mut self, width: usize) -> Self {
        self.chunk_width = Some(width);
        self
    }

    /// Builder using the configured first key pair, cipher and source form
    pub fn from_config(config: &Config) -> SignResult<Self> {
        config.validate()?;
        Ok(Self {
            signer: config.signer()?,
            cipher: config.source_cipher()?,
            encoding: config.source.encoding,
            chunk_width: config.chunk_width(),
        })
    }

    pub fn is_signed(&self) -> bool {
        self.signer.is_some()
    }

    /// Unsigned path for `options` and `url`
    pub fn build_path(
        &self,
        options: &ProcessingOptions,
        url: &str,
        extension: Option<&str>,
    ) -> SignResult<Path> {
        let source = self.encoding.reference(url, self.chunk_width);
        let mut builder = PathBuilder::new(source).options(options);
        if let Some(ext) = extension {
            builder = builder.extension(ext);
        }
        builder.build(self.cipher.as_ref())
    }

    /// Signed path for `options` and `url`
    pub fn build(
        &self,
        options: &ProcessingOptions,
        url: &str,
        extension: Option<&str>,
    ) -> SignResult<String> {
        let path = self.build_path(options, url, extension)?;
        Ok(self.sign(&path))
    }

    /// Prepend the signature segment to an already built path
    pub fn sign(&self, path: &Path) -> String {
        match &self.signer {
            Some(signer) => signer.sign_path(path.as_str()),
            None => format!("/{}{}", INSECURE_SIGNATURE, path),
        }
    }
}
