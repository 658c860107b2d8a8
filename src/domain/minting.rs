//! Generates fresh public ids and secret token values.
//!
//! Produces the two distinct, prefixed identifiers this core's invariants
//! require: `at_`-prefixed public ids and `t_`-prefixed secret tokens.

use base64::Engine;
use rand::{RngCore, rngs::OsRng};

const PUBLIC_ID_PREFIX: &str = "at_";
const TOKEN_PREFIX: &str = "t_";

/// Entropy carried by a minted public id, in bytes. 15 bytes base64url-encodes
/// to 20 characters, meeting the "≥ 20 characters of entropy" floor required
/// of public ids.
const PUBLIC_ID_ENTROPY_BYTES: usize = 15;

/// Entropy carried by a minted token, in bytes; at least 24 is required.
const TOKEN_ENTROPY_BYTES: usize = 32;

fn random_url_safe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Mints a fresh, URL-safe `public_id`, stable in shape across repository
/// versions: always `at_` followed by base64url characters.
#[must_use]
pub fn new_public_id() -> String {
    format!("{PUBLIC_ID_PREFIX}{}", random_url_safe(PUBLIC_ID_ENTROPY_BYTES))
}

/// Mints a fresh, high-entropy secret `token` value.
#[must_use]
pub fn new_token() -> String {
    format!("{TOKEN_PREFIX}{}", random_url_safe(TOKEN_ENTROPY_BYTES))
}
