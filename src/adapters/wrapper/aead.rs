//! A self-contained AEAD-backed [`Wrapper`].
//!
//! Built on `aes-gcm`, a RustCrypto symmetric primitive, since no
//! higher-level "KMS client" crate fits embedding directly into a library
//! with no network calls of its own.
//!
//! This is one key version per process; a production deployment backed by
//! a real KMS would implement [`Wrapper`] against that service instead and
//! rotate `key_id` as versions change.

use super::Wrapper;
use crate::domain::ids::KeyId;
use crate::error::{RepoError, Result};
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use async_trait::async_trait;

const NONCE_LEN: usize = 12;

/// An in-process AEAD wrapper keyed by a single 256-bit key, identified by
/// `key_id`. Ciphertexts are `nonce || aes_gcm_ciphertext`.
#[derive(Clone)]
pub struct AeadWrapper {
    cipher: Aes256Gcm,
    key_id: KeyId,
}

impl std::fmt::Debug for AeadWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadWrapper").field("key_id", &self.key_id).finish_non_exhaustive()
    }
}

impl AeadWrapper {
    /// Builds a wrapper from a raw 32-byte key and the version identifier
    /// that should be stamped on everything it encrypts.
    #[must_use]
    pub fn new(key_bytes: &[u8; 32], key_id: impl Into<KeyId>) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key_bytes);
        Self { cipher: Aes256Gcm::new(key), key_id: key_id.into() }
    }
}

#[async_trait]
impl Wrapper for AeadWrapper {
    async fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, KeyId)> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut out = self.cipher.encrypt(&nonce, plaintext).map_err(|_| RepoError::Crypto)?;
        let mut sealed = nonce.to_vec();
        sealed.append(&mut out);
        Ok((sealed, self.key_id.clone()))
    }

    async fn decrypt(&self, ciphertext: &[u8], key_id: &KeyId) -> Result<Vec<u8>> {
        if key_id != &self.key_id {
            return Err(RepoError::Crypto);
        }
        if ciphertext.len() < NONCE_LEN {
            return Err(RepoError::Crypto);
        }
        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        self.cipher.decrypt(nonce, sealed).map_err(|_| RepoError::Crypto)
    }
}
