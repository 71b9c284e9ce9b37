// Configuration unit tests: YAML loading, env substitution and validation

use imgsign::config::Config;
use imgsign::error::SignError;
use imgsign::logging::LogFormat;
use imgsign::source::SourceEncoding;
use imgsign::UrlBuilder;
use std::io::Write;

const KEY: &str = "943b421c9eb07c830af81030552c86009268de4e532ba2ee2eab8247c6da0881";
const SALT: &str = "520f986b998545b4785e0defbc4f3c1203f22de2374a3d53cb7a7fe9fea309c5";
const OLD_KEY: &str = "aabbccdd";
const OLD_SALT: &str = "11223344";
const ENC_KEY: &str = "1eb5b0e971ad7f45324c1bb15c947cb207c43152fa5c6c7f35c4f36e0c18e0f1";

fn write_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_can_load_full_config_from_file() {
    std::env::set_var("IMGSIGN_UNIT_ENC_KEY", ENC_KEY);
    let file = write_config(&format!(
        r#"
signing:
  keys:
    - key: "{KEY}"
      salt: "{SALT}"
    - key: "{OLD_KEY}"
      salt: "{OLD_SALT}"
  signature_size: 16
  path_prefix: "/img"
encryption:
  key: "${{IMGSIGN_UNIT_ENC_KEY}}"
source:
  encoding: encrypted
logging:
  level: warn
  format: pretty
"#
    ));

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert_eq!(config.signing.keys.len(), 2);
    assert_eq!(config.signature_size().unwrap().bytes(), 16);
    assert_eq!(config.source.encoding, SourceEncoding::Encrypted);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.source_cipher().unwrap().is_some());
}

/// Test: the first key pair signs, every key pair verifies
#[test]
fn test_rotated_keys_verify_builder_output() {
    let yaml = format!(
        "signing:\n  keys:\n    - key: \"{OLD_KEY}\"\n      salt: \"{OLD_SALT}\"\n    - key: \"{KEY}\"\n      salt: \"{SALT}\"\n"
    );
    let config = Config::from_yaml_with_env(&yaml).unwrap();

    let signed = UrlBuilder::from_config(&config)
        .unwrap()
        .build(&Default::default(), "http://example.com/a.png", None)
        .unwrap();
    assert!(config.verifier().unwrap().verify_request_path(&signed).is_ok());
}

#[test]
fn test_path_prefix_applies_to_verifier() {
    let yaml = format!(
        "signing:\n  keys:\n    - key: \"{KEY}\"\n      salt: \"{SALT}\"\n  path_prefix: /images\n"
    );
    let config = Config::from_yaml_with_env(&yaml).unwrap();
    let signed = UrlBuilder::from_config(&config)
        .unwrap()
        .build(&Default::default(), "http://example.com/a.png", None)
        .unwrap();

    let verifier = config.verifier().unwrap();
    assert!(verifier
        .verify_request_path(&format!("/images{}", signed))
        .is_ok());
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let file = write_config("signing: [unclosed");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(SignError::Config(_))
    ));
}

#[test]
fn test_unknown_encoding_rejected() {
    assert!(matches!(
        Config::from_yaml_with_env("source:\n  encoding: rot13\n"),
        Err(SignError::Config(_))
    ));
}

#[test]
fn test_bad_salt_names_field_only() {
    let yaml = format!("signing:\n  keys:\n    - key: \"{KEY}\"\n      salt: \"xyz\"\n");
    let file = write_config(&yaml);
    let err = Config::from_file(file.path()).unwrap_err();
    assert_eq!(err, SignError::InvalidEncoding { field: "salt" });
    assert!(!err.to_string().contains(KEY));
}

#[test]
fn test_file_is_validated_on_load() {
    let file = write_config("signing:\n  signature_size: 0\n");
    assert_eq!(
        Config::from_file(file.path()).unwrap_err(),
        SignError::InvalidSignatureSize(0)
    );
}
