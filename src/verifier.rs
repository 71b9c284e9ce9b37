//! Signature verification for incoming request paths
//!
//! Provides:
//! - Splitting `/<signature>/<path>` request paths (query and prefix stripped)
//! - Re-normalisation of `http:/` collapsed by HTTP layers
//! - Constant-time comparison against every configured key pair
//! - Trusted signatures and the disabled (no keys) mode

use hmac::Mac;

use crate::codec::decode_base64url;
use crate::error::{SignError, SignResult};
use crate::secret::KeyPair;
use crate::signature::{keyed_mac, SignatureSize};

const PLAIN_SEGMENT: &str = "/plain/";

/// Verifies signatures produced by [`crate::signature::Signer`]
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    keys: Vec<KeyPair>,
    size: SignatureSize,
    trusted_signatures: Vec<String>,
    path_prefix: Option<String>,
}

impl Verifier {
    /// Verifier accepting signatures from any of `keys`
    ///
    /// With no keys every signature is accepted.
    pub fn new(keys: Vec<KeyPair>) -> Self {
        if keys.is_empty() {
            tracing::warn!("No keys defined, signature checking is disabled");
        }
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Expected signature size; must match the signer's
    pub fn with_size(mut self, size: SignatureSize) -> Self {
        self.size = size;
        self
    }

    /// Tokens accepted verbatim without recomputation
    pub fn with_trusted_signatures(mut self, trusted: Vec<String>) -> Self {
        self.trusted_signatures = trusted;
        self
    }

    /// Prefix stripped from request paths before splitting
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.path_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Check `signature` against `path` (which includes its leading `/`)
    ///
    /// # Returns
    /// * `Ok(())` if any key pair matches, the token is trusted, or checking is disabled
    /// * `Err(SignError::MalformedSignature)` if the token looks like a processing option
    /// * `Err(SignError::SignatureMismatch)` otherwise
    pub fn verify(&self, signature: &str, path: &str) -> SignResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        if self
            .trusted_signatures
            .iter()
            .any(|trusted| constant_time_compare(trusted, signature))
        {
            return Ok(());
        }

        if signature.contains(':') {
            tracing::warn!(reason = "malformed", "Signature verification failed");
            return Err(SignError::MalformedSignature);
        }

        let provided = match decode_base64url(signature, "signature") {
            Ok(bytes) if bytes.len() == self.size.bytes() => bytes,
            _ => {
                tracing::warn!(reason = "encoding", "Signature verification failed");
                return Err(SignError::SignatureMismatch);
            }
        };

        let matched = self.keys.iter().any(|pair| {
            keyed_mac(pair.key.as_bytes(), pair.salt.as_bytes(), path)
                .verify_truncated_left(&provided)
                .is_ok()
        });

        if matched {
            Ok(())
        } else {
            tracing::warn!(reason = "mismatch", "Signature verification failed");
            Err(SignError::SignatureMismatch)
        }
    }

    /// Split, normalise and verify a raw request path
    ///
    /// Returns the verified path (leading `/`, no signature) ready for
    /// option parsing.
    pub fn verify_request_path(&self, request_path: &str) -> SignResult<String> {
        let (signature, path) = split_signed_path(request_path, self.path_prefix.as_deref())?;
        self.verify(signature, &path)?;
        Ok(path)
    }
}

/// Split `/<signature>/<rest>` into the signature and `/<rest>`
///
/// The query string and an optional `prefix` are removed first, and the
/// remaining path is re-normalised with [`redenormalize_path`].
pub fn split_signed_path<'a>(
    request_path: &'a str,
    prefix: Option<&str>,
) -> SignResult<(&'a str, String)> {
    let path = request_path
        .split_once('?')
        .map_or(request_path, |(path, _)| path);

    let path = match prefix {
        Some(prefix) if !prefix.is_empty() => path.strip_prefix(prefix).unwrap_or(path),
        _ => path,
    };

    let path = path.strip_prefix('/').unwrap_or(path);

    match path.find('/') {
        Some(end) if end > 0 && end + 1 < path.len() => {
            Ok((&path[..end], redenormalize_path(&path[end..])))
        }
        _ => Err(SignError::invalid_path(format!(
            "missing signature or path: {}",
            request_path
        ))),
    }
}

/// Restore `scheme://` in plain sources whose `//` was merged to `/`
///
/// `local:` sources are absolute file URLs and get `local:///`.
pub fn redenormalize_path(path: &str) -> String {
    let Some(start) = path.find(PLAIN_SEGMENT) else {
        return path.to_string();
    };
    let url_start = start + PLAIN_SEGMENT.len();
    let url = &path[url_start..];

    let Some(colon) = url.find(':') else {
        return path.to_string();
    };
    let scheme = &url[..colon];
    let after = &url[colon + 1..];

    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme || !after.starts_with('/') || after.starts_with("//") || after.len() == 1 {
        return path.to_string();
    }

    let missing = if scheme == "local" { "//" } else { "/" };
    format!("{}{}:{}{}", &path[..url_start], scheme, missing, after)
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
