//! Master key handling and at-rest encryption for preference entries.
//!
//! # Responsibility
//! - Load or create the 32-byte master key file.
//! - Derive separate keys for slot hashing and value sealing.
//! - Seal values with AES-256-GCM bound to their namespace and key.
//!
//! # Invariants
//! - Slot hashes are deterministic for a given master key.
//! - Every sealed blob is `nonce (12 bytes) || ciphertext+tag`.
//! - Key material is zeroized on drop.

use crate::repo::prefs_repo::{PrefsError, PrefsResult};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const INDEX_KEY_LABEL: &[u8] = b"nextstep-prefs-index-v1";
const VALUE_KEY_LABEL: &[u8] = b"nextstep-prefs-value-v1";

/// Root secret for one preference database.
pub struct VaultKey([u8; KEY_LEN]);

impl VaultKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Fresh random key from the thread RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Reads the key file at `path`, creating it with a random key when absent.
    ///
    /// # Errors
    /// - The file exists but is not exactly 32 bytes.
    /// - The file or its parent directory cannot be read or written.
    pub fn load_or_create(path: &Path) -> PrefsResult<Self> {
        if path.exists() {
            let mut bytes = std::fs::read(path).map_err(|err| key_file_error(path, err))?;
            if bytes.len() != KEY_LEN {
                let found = bytes.len();
                bytes.zeroize();
                return Err(PrefsError::KeyFile {
                    path: path.to_path_buf(),
                    message: format!("expected {KEY_LEN} bytes, found {found}"),
                });
            }
            let mut key = [0u8; KEY_LEN];
            key.copy_from_slice(&bytes);
            bytes.zeroize();
            return Ok(Self(key));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| key_file_error(path, err))?;
        }
        let key = Self::generate();
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| key_file_error(path, err))?;
        file.write_all(&key.0)
            .and_then(|()| file.sync_all())
            .map_err(|err| key_file_error(path, err))?;
        log::info!("event=vault_key_create module=vault status=ok");
        Ok(key)
    }
}

impl Drop for VaultKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Derived keys used by [`crate::EncryptedPrefs`].
pub struct VaultCipher {
    index_key: [u8; KEY_LEN],
    value_key: [u8; KEY_LEN],
}

impl VaultCipher {
    pub fn new(master: &VaultKey) -> PrefsResult<Self> {
        Ok(Self {
            index_key: hmac_bytes(&master.0, &[INDEX_KEY_LABEL])?,
            value_key: hmac_bytes(&master.0, &[VALUE_KEY_LABEL])?,
        })
    }

    /// Opaque, deterministic identifier for a namespace.
    pub fn namespace_hash(&self, namespace: &str) -> PrefsResult<String> {
        let digest = hmac_bytes(&self.index_key, &[b"ns\0", namespace.as_bytes()])?;
        Ok(hex::encode(digest))
    }

    /// Opaque, deterministic identifier for a key inside a namespace.
    pub fn entry_key_hash(&self, namespace: &str, key: &str) -> PrefsResult<String> {
        let digest = hmac_bytes(
            &self.index_key,
            &[b"key\0", namespace.as_bytes(), b"\0", key.as_bytes()],
        )?;
        Ok(hex::encode(digest))
    }

    pub fn seal(&self, namespace: &str, key: &str, plaintext: &[u8]) -> PrefsResult<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.value_key)
            .map_err(|_| PrefsError::Crypto("invalid value key length"))?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let aad = associated_data(namespace, key);

        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: plaintext,
                    aad: &aad,
                },
            )
            .map_err(|_| PrefsError::Crypto("value encryption failed"))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    pub fn open(&self, namespace: &str, key: &str, sealed: &[u8]) -> PrefsResult<Vec<u8>> {
        if sealed.len() < NONCE_LEN {
            return Err(PrefsError::Crypto("sealed value too short"));
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.value_key)
            .map_err(|_| PrefsError::Crypto("invalid value key length"))?;
        let aad = associated_data(namespace, key);

        cipher
            .decrypt(
                Nonce::from_slice(nonce_bytes),
                Payload {
                    msg: ciphertext,
                    aad: &aad,
                },
            )
            .map_err(|_| PrefsError::Crypto("value decryption failed"))
    }
}

impl Drop for VaultCipher {
    fn drop(&mut self) {
        self.index_key.zeroize();
        self.value_key.zeroize();
    }
}

fn associated_data(namespace: &str, key: &str) -> Vec<u8> {
    let mut aad = Vec::with_capacity(namespace.len() + key.len() + 1);
    aad.extend_from_slice(namespace.as_bytes());
    aad.push(0);
    aad.extend_from_slice(key.as_bytes());
    aad
}

fn hmac_bytes(key: &[u8], parts: &[&[u8]]) -> PrefsResult<[u8; KEY_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| PrefsError::Crypto("invalid hmac key length"))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn key_file_error(path: &Path, err: std::io::Error) -> PrefsError {
    PrefsError::KeyFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
