//! Source URL encryption with AES-256-CBC
//!
//! Blob layout:
//!
//! ```text
//! IV (16 bytes) || AES-256-CBC(key, IV, PKCS#7(plaintext))
//! ```
//!
//! Decryption removes padding itself rather than trusting the block mode.
//! Every failure, padding or otherwise, surfaces as the same
//! [`SignError::InvalidPadding`]. Encrypted sources must still be signed:
//! the signature rejects a tampered blob before it is ever decrypted.

use std::fmt;

use aes::Aes256;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{SignError, SignResult};
use crate::secret::Secret;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size, also the IV size
pub const BLOCK_SIZE: usize = 16;

/// AES-256 key size
pub const KEY_SIZE: usize = 32;

/// Encrypts and decrypts source URLs with one fixed key
#[derive(Clone)]
pub struct SourceCipher {
    cipher: Aes256,
}

impl SourceCipher {
    /// Build from a 32-byte secret
    pub fn new(key: &Secret) -> SignResult<Self> {
        let cipher = Aes256::new_from_slice(key.as_bytes()).map_err(|_| {
            SignError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            }
        })?;
        Ok(Self { cipher })
    }

    /// Encrypt with a fresh IV from the OS random source
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut iv = [0u8; BLOCK_SIZE];
        OsRng.fill_bytes(&mut iv);
        self.encrypt_with_iv(&iv, plaintext)
    }

    /// Encrypt with a caller-chosen IV
    ///
    /// Reusing an IV under the same key reveals whether two plaintexts
    /// share a prefix. Prefer [`SourceCipher::encrypt`] unless the caller
    /// deliberately wants deterministic output.
    pub fn encrypt_with_iv(&self, iv: &[u8; BLOCK_SIZE], plaintext: &[u8]) -> Vec<u8> {
        let ciphertext =
            Aes256CbcEnc::inner_iv_init(self.cipher.clone(), GenericArray::from_slice(iv))
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut blob = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
        blob.extend_from_slice(iv);
        blob.extend_from_slice(&ciphertext);

        tracing::debug!(
            plaintext_len = plaintext.len(),
            blob_len = blob.len(),
            "Encrypted source URL"
        );
        blob
    }

    /// Decrypt an `IV || ciphertext` blob and strip its PKCS#7 padding
    pub fn decrypt(&self, blob: &[u8]) -> SignResult<Vec<u8>> {
        if blob.len() < 2 * BLOCK_SIZE || blob.len() % BLOCK_SIZE != 0 {
            return Err(SignError::InvalidPadding);
        }
        let (iv, ciphertext) = blob.split_at(BLOCK_SIZE);

        let decrypted = Aes256CbcDec::inner_iv_slice_init(self.cipher.clone(), iv)
            .map_err(|_| SignError::InvalidPadding)?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| SignError::InvalidPadding)?;

        strip_pkcs7(decrypted)
    }
}

impl fmt::Debug for SourceCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceCipher(<redacted>)")
    }
}

/// Encrypt `plaintext` under `key` with a random IV
pub fn encrypt(plaintext: &[u8], key: &Secret) -> SignResult<Vec<u8>> {
    Ok(SourceCipher::new(key)?.encrypt(plaintext))
}

/// Decrypt a blob produced by [`encrypt`]
pub fn decrypt(blob: &[u8], key: &Secret) -> SignResult<Vec<u8>> {
    SourceCipher::new(key)?.decrypt(blob)
}

/// Validate and remove PKCS#7 padding from a whole number of blocks
///
/// The last block is scanned in full regardless of the claimed pad length
/// so the work done does not depend on where the padding goes wrong.
fn strip_pkcs7(mut data: Vec<u8>) -> SignResult<Vec<u8>> {
    if data.len() < BLOCK_SIZE {
        return Err(SignError::InvalidPadding);
    }

    let pad = data[data.len() - 1];
    let pad_len = pad as usize;

    let mut bad = u8::from(pad_len == 0) | u8::from(pad_len > BLOCK_SIZE);
    let tail = &data[data.len() - BLOCK_SIZE..];
    for (offset, &byte) in tail.iter().rev().enumerate() {
        // 0xff inside the claimed padding, 0x00 outside
        let in_pad = u8::from(offset < pad_len).wrapping_neg();
        bad |= in_pad & (byte ^ pad);
    }

    if bad != 0 {
        return Err(SignError::InvalidPadding);
    }

    data.truncate(data.len() - pad_len);
    Ok(data)
}
