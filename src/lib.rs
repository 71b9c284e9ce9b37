// imgsign: URL signing and source encryption for image proxies

pub mod builder;
pub mod codec;
pub mod config;
pub mod encryption;
pub mod error;
pub mod logging;
pub mod options;
pub mod path;
pub mod secret;
pub mod signature;
pub mod source;
pub mod verifier;

pub use builder::UrlBuilder;
pub use config::Config;
pub use encryption::SourceCipher;
pub use error::{SignError, SignResult};
pub use options::{Gravity, Modifier, OutputFormat, ProcessingOptions, ResizeType};
pub use path::{build_path, Path, PathBuilder};
pub use secret::{KeyPair, Secret};
pub use signature::{build_signed_path, sign, Signature, SignatureSize, Signer};
pub use source::{decode_source, DecodedSource, SourceEncoding, SourceReference};
pub use verifier::{redenormalize_path, split_signed_path, Verifier};
