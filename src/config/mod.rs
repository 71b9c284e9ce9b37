// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use crate::encryption::SourceCipher;
use crate::error::{SignError, SignResult};
use crate::logging::LoggingConfig;
use crate::secret::{KeyPair, Secret};
use crate::signature::{SignatureSize, Signer, FULL_SIGNATURE_SIZE};
use crate::source::SourceEncoding;
use crate::verifier::Verifier;

/// Regex for `${VAR_NAME}` references
static ENV_PATTERN: OnceLock<Regex> = OnceLock::new();

fn env_pattern() -> &'static Regex {
    ENV_PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .expect("Invalid env regex - this is a compile-time bug")
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub signing: SigningConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionConfig>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HMAC signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Key/salt pairs; the first signs, all verify
    #[serde(default)]
    pub keys: Vec<KeyPairConfig>,

    /// Signature size in bytes (default: 32, untruncated)
    #[serde(default = "default_signature_size")]
    pub signature_size: usize,

    /// Tokens accepted without recomputation
    #[serde(default)]
    pub trusted_signatures: Vec<String>,

    /// Prefix stripped from request paths before verification
    #[serde(default)]
    pub path_prefix: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            signature_size: default_signature_size(),
            trusted_signatures: Vec::new(),
            path_prefix: String::new(),
        }
    }
}

fn default_signature_size() -> usize {
    FULL_SIGNATURE_SIZE
}

/// Hex-encoded key and salt
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyPairConfig {
    pub key: String,
    pub salt: String,
}

impl fmt::Debug for KeyPairConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairConfig")
            .field("key", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Source URL encryption configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Hex-encoded 32-byte AES key
    pub key: String,
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// How source URLs are rendered by default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub encoding: SourceEncoding,

    /// Base64 chunk width; unset disables chunking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_width: Option<usize>,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> SignResult<Self> {
        let re = env_pattern();

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(SignError::config(format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| SignError::config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SignResult<Self> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| SignError::config(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_yaml_with_env(&yaml)?;
        config.validate()?;

        tracing::info!(
            keys = config.signing.keys.len(),
            signature_size = config.signing.signature_size,
            encryption = config.encryption.is_some(),
            source_encoding = ?config.source.encoding,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Decode every secret once and check cross-field constraints
    pub fn validate(&self) -> SignResult<()> {
        self.signature_size()?;
        self.key_pairs()?;
        let cipher = self.source_cipher()?;

        if self.source.encoding == SourceEncoding::Encrypted && cipher.is_none() {
            return Err(SignError::config(
                "source encoding is 'encrypted' but no encryption key is configured",
            ));
        }

        if self.source.chunk_width == Some(0) {
            return Err(SignError::config("chunk_width must be greater than 0"));
        }

        if self.source.chunk_width.is_some() && self.source.encoding != SourceEncoding::Base64 {
            tracing::warn!(
                source_encoding = ?self.source.encoding,
                "chunk_width only applies to base64 sources and will be ignored"
            );
        }

        Ok(())
    }

    pub fn signature_size(&self) -> SignResult<SignatureSize> {
        SignatureSize::new(self.signing.signature_size)
    }

    pub fn key_pairs(&self) -> SignResult<Vec<KeyPair>> {
        self.signing
            .keys
            .iter()
            .map(|pair| KeyPair::from_hex(&pair.key, &pair.salt))
            .collect()
    }

    pub fn source_cipher(&self) -> SignResult<Option<SourceCipher>> {
        self.encryption
            .as_ref()
            .map(|enc| SourceCipher::new(&Secret::from_hex(&enc.key, "encryption key")?))
            .transpose()
    }

    /// Signer using the first key pair, if any
    pub fn signer(&self) -> SignResult<Option<Signer>> {
        let size = self.signature_size()?;
        Ok(self
            .key_pairs()?
            .into_iter()
            .next()
            .map(|pair| Signer::new(pair).with_size(size)))
    }

    pub fn verifier(&self) -> SignResult<Verifier> {
        Ok(Verifier::new(self.key_pairs()?)
            .with_size(self.signature_size()?)
            .with_trusted_signatures(self.signing.trusted_signatures.clone())
            .with_path_prefix(self.signing.path_prefix.clone()))
    }

    /// Configured chunk width for base64 sources
    pub fn chunk_width(&self) -> Option<usize> {
        self.source.chunk_width
    }
}
