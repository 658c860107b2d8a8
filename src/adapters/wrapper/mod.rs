//! The KMS wrapper seam: an opaque encrypt/decrypt oracle.
//!
//! The repository never handles raw key material; it only ever calls
//! through this trait. [`aead`] provides a concrete, self-contained
//! implementation suitable for embedding applications that don't already
//! have an external KMS client to plug in.

pub mod aead;

use crate::domain::ids::KeyId;
use crate::error::Result;
use async_trait::async_trait;

/// Encrypts and decrypts opaque byte blobs, binding each ciphertext to a
/// key-version identifier the caller must present again on decrypt.
#[async_trait]
pub trait Wrapper: Send + Sync {
    /// Encrypts `plaintext`, returning the ciphertext and the identifier of
    /// the key version used.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, KeyId)>;

    /// Decrypts `ciphertext` that was produced under `key_id`.
    async fn decrypt(&self, ciphertext: &[u8], key_id: &KeyId) -> Result<Vec<u8>>;
}
