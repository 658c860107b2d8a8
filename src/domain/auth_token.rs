//! The `AuthToken` entity.
//!
//! Two projections exist, the same entity/row split used elsewhere for
//! secrets that must never leave the store in the clear unasked:
//!
//! * [`AuthToken`], the public value callers see. It never carries
//!   `ct_token`, and carries `token` only when the caller is meant to see
//!   the plaintext secret.
//! * [`AuthTokenRow`], the writable projection the store persists, which
//!   does carry `ct_token`/`key_id` and never carries the plaintext.

use crate::adapters::wrapper::Wrapper;
use crate::domain::ids::{AuthAccountId, AuthMethodId, IamUserId, KeyId, PublicId, ScopeId};
use crate::error::{RepoError, Result};
use time::OffsetDateTime;

/// The value callers of the repository see.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub public_id: PublicId,
    /// Plaintext secret. Present only straight out of `create_auth_token`,
    /// or transiently inside `validate_token` before the match check.
    /// Always empty on every other return path.
    pub token: String,
    pub auth_account_id: AuthAccountId,
    pub iam_user_id: IamUserId,
    pub scope_id: ScopeId,
    pub auth_method_id: AuthMethodId,
    pub create_time: OffsetDateTime,
    pub update_time: OffsetDateTime,
    pub approximate_last_access_time: OffsetDateTime,
    pub expiration_time: OffsetDateTime,
}

impl AuthToken {
    /// Clears the plaintext secret on the egress path.
    pub fn sanitize(&mut self) {
        self.token.clear();
    }

    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.expiration_time
    }

    #[must_use]
    pub fn is_stale(&self, now: OffsetDateTime, max_staleness: time::Duration) -> bool {
        now - self.approximate_last_access_time > max_staleness
    }

    /// A row is valid iff neither expired nor stale.
    #[must_use]
    pub fn is_valid(&self, now: OffsetDateTime, max_staleness: time::Duration) -> bool {
        !self.is_expired(now) && !self.is_stale(now, max_staleness)
    }

    /// Encrypts `self.token` via `wrapper`, producing the writable row. The
    /// plaintext is left untouched on `self`; callers return it from
    /// `create_auth_token` only.
    pub async fn to_writable(&self, wrapper: &dyn Wrapper) -> Result<AuthTokenRow> {
        let (ct_token, key_id) = wrapper.encrypt(self.token.as_bytes()).await?;
        Ok(AuthTokenRow {
            public_id: self.public_id.clone(),
            ct_token,
            key_id,
            auth_account_id: self.auth_account_id.clone(),
            iam_user_id: self.iam_user_id.clone(),
            scope_id: self.scope_id.clone(),
            auth_method_id: self.auth_method_id.clone(),
            create_time: self.create_time,
            update_time: self.update_time,
            approximate_last_access_time: self.approximate_last_access_time,
            expiration_time: self.expiration_time,
        })
    }
}

/// The value the store persists: carries the ciphertext, never the
/// plaintext.
#[derive(Debug, Clone)]
pub struct AuthTokenRow {
    pub public_id: PublicId,
    pub ct_token: Vec<u8>,
    pub key_id: KeyId,
    pub auth_account_id: AuthAccountId,
    pub iam_user_id: IamUserId,
    pub scope_id: ScopeId,
    pub auth_method_id: AuthMethodId,
    pub create_time: OffsetDateTime,
    pub update_time: OffsetDateTime,
    pub approximate_last_access_time: OffsetDateTime,
    pub expiration_time: OffsetDateTime,
}

impl AuthTokenRow {
    /// Projects back to the public value, decrypting the token only when
    /// `with_token_value` is set (the internal option `lookup_auth_token`
    /// exposes only to `validate_token`).
    pub async fn from_writable(self, wrapper: &dyn Wrapper, with_token_value: bool) -> Result<AuthToken> {
        let token = if with_token_value {
            let plaintext = wrapper.decrypt(&self.ct_token, &self.key_id).await?;
            String::from_utf8(plaintext).map_err(|_| RepoError::Crypto)?
        } else {
            String::new()
        };

        Ok(AuthToken {
            public_id: self.public_id,
            token,
            auth_account_id: self.auth_account_id,
            iam_user_id: self.iam_user_id,
            scope_id: self.scope_id,
            auth_method_id: self.auth_method_id,
            create_time: self.create_time,
            update_time: self.update_time,
            approximate_last_access_time: self.approximate_last_access_time,
            expiration_time: self.expiration_time,
        })
    }
}
