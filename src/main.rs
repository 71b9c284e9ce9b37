use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use imgsign::codec::encode_base64url;
use imgsign::config::Config;
use imgsign::options::{Modifier, ProcessingOptions};
use imgsign::source::{decode_source, SourceEncoding};
use imgsign::UrlBuilder;
use std::path::PathBuf;

/// imgsign - signed URL paths and encrypted sources for image proxies
#[derive(Parser, Debug)]
#[command(name = "imgsign")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file; without one, paths are unsigned
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and sign a path for a source URL
    Sign {
        /// Source image URL
        #[arg(short, long)]
        source: String,

        /// Modifier segment, e.g. `rs:fit:300:300` (repeatable, order is kept)
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,

        /// Output extension appended to the source
        #[arg(short, long)]
        extension: Option<String>,

        /// Override the configured source encoding
        #[arg(long, value_enum)]
        encoding: Option<EncodingArg>,
    },

    /// Verify a signed path (exits non-zero when invalid)
    Verify {
        /// `/<signature>/<path>` as received by the proxy
        signed_path: String,
    },

    /// Encrypt a source URL
    Encrypt { url: String },

    /// Decrypt an encrypted source blob (optionally with `.ext`)
    Decrypt { blob: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncodingArg {
    Plain,
    Base64,
    Encrypted,
}

impl From<EncodingArg> for SourceEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Plain => SourceEncoding::Plain,
            EncodingArg::Base64 => SourceEncoding::Base64,
            EncodingArg::Encrypted => SourceEncoding::Encrypted,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    imgsign::logging::init_subscriber_with(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = ?args.config,
        keys = config.signing.keys.len(),
        encryption = config.encryption.is_some(),
        "Configuration loaded successfully"
    );

    match args.command {
        Command::Sign {
            source,
            options,
            extension,
            encoding,
        } => {
            let mut builder =
                UrlBuilder::from_config(&config).context("Invalid signing configuration")?;
            if let Some(encoding) = encoding {
                builder = builder.with_encoding(encoding.into());
            }
            let options = options
                .into_iter()
                .fold(ProcessingOptions::new(), |opts, seg| {
                    opts.modifier(Modifier::raw(seg))
                });

            let signed = builder
                .build(&options, &source, extension.as_deref())
                .context("Failed to build signed path")?;

            emit(args.json, serde_json::json!({ "path": signed }), &signed);
        }
        Command::Verify { signed_path } => {
            let verifier = config.verifier().context("Invalid signing configuration")?;
            let path = verifier
                .verify_request_path(&signed_path)
                .context("Signature verification failed")?;

            emit(
                args.json,
                serde_json::json!({ "valid": true, "path": path }),
                &path,
            );
        }
        Command::Encrypt { url } => {
            let cipher = config
                .source_cipher()?
                .ok_or_else(|| anyhow!("No encryption key configured"))?;
            let blob = encode_base64url(&cipher.encrypt(url.as_bytes()));

            emit(args.json, serde_json::json!({ "blob": blob }), &blob);
        }
        Command::Decrypt { blob } => {
            let cipher = config
                .source_cipher()?
                .ok_or_else(|| anyhow!("No encryption key configured"))?;
            let decoded = decode_source(&["enc", blob.as_str()], Some(&cipher))
                .context("Failed to decrypt source")?;

            emit(
                args.json,
                serde_json::json!({ "url": decoded.url, "extension": decoded.extension }),
                &decoded.url,
            );
        }
    }

    Ok(())
}

fn emit(json: bool, value: serde_json::Value, plain: &str) {
    if json {
        println!("{}", value);
    } else {
        println!("{}", plain);
    }
}
