//! The transactional store seam.
//!
//! Split into [`Reader`] (non-mutating lookups) and [`Writer`] (mutations
//! that must pair a row change with a change-log entry), without a generic
//! `do_tx(fn)` envelope: where a higher-order closure would be awkward,
//! this crate instead has each `Writer` method own its transaction end to
//! end and return a typed outcome.

use crate::domain::auth_token::AuthTokenRow;
use crate::domain::ids::{AuthAccountId, AuthMethodId, IamUserId, KeyId, PublicId, ScopeId};
use crate::domain::metadata::ChangeLogMetadata;
use crate::error::Result;
use async_trait::async_trait;
use time::OffsetDateTime;

/// The account collaborator the create path resolves `scope_id`,
/// `auth_method_id`, and `iam_user_id` from. Owned by a separate
/// subsystem; this core only ever reads it.
#[derive(Debug, Clone)]
pub struct AuthAccount {
    pub public_id: AuthAccountId,
    pub iam_user_id: IamUserId,
    pub scope_id: ScopeId,
    pub auth_method_id: AuthMethodId,
}

/// Per-call search options; a `None` limit means "use the repository's
/// default".
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOpts {
    pub limit: Option<i64>,
}

/// Everything about a token to be created that does not depend on the
/// account it will be attached to: a minted, already-encrypted candidate
/// row. The adapter fills in `auth_account_id`, `iam_user_id`, `scope_id`,
/// and `auth_method_id` from the account it resolves inside the same
/// transaction as the insert.
#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub public_id: PublicId,
    pub ct_token: Vec<u8>,
    pub key_id: KeyId,
    pub create_time: OffsetDateTime,
    pub update_time: OffsetDateTime,
    pub approximate_last_access_time: OffsetDateTime,
    pub expiration_time: OffsetDateTime,
}

/// Outcome of [`Writer::create_auth_token`]. A separate variant from a bare
/// `Result` because the create path must distinguish "no such account"
/// (not-found) from "account belongs to someone else" (mismatch), unlike
/// `validate_token`, which deliberately conflates them.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(AuthTokenRow),
    AccountNotFound,
    Mismatch { account_id: AuthAccountId, iam_user_id: IamUserId },
}

#[async_trait]
pub trait Reader: Send + Sync {
    async fn lookup_auth_token(&self, id: &PublicId) -> Result<Option<AuthTokenRow>>;

    async fn lookup_auth_account(&self, id: &AuthAccountId) -> Result<Option<AuthAccount>>;

    async fn search_auth_tokens_by_scope(
        &self,
        scope_id: &ScopeId,
        opts: SearchOpts,
    ) -> Result<Vec<AuthTokenRow>>;
}

#[async_trait]
pub trait Writer: Send + Sync {
    /// Resolves `auth_account_id`, checks it belongs to `expected_iam_user_id`,
    /// and inserts `new_token` with the paired change-log entry, atomically.
    /// A single attempt: the caller is responsible for re-minting a fresh
    /// `public_id` and retrying on a unique-violation (see
    /// [`crate::error::RepoError::is_retriable`]).
    async fn create_auth_token(
        &self,
        auth_account_id: &AuthAccountId,
        expected_iam_user_id: &IamUserId,
        new_token: NewAuthToken,
    ) -> Result<CreateOutcome>;

    /// Nulls `approximate_last_access_time` through a field mask so the
    /// store's commit-time trigger stamps it with a database-side clock.
    /// Returns the number of rows affected; callers must treat `> 1` as
    /// [`crate::error::RepoError::MultipleRecords`].
    async fn update_last_access(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64>;

    async fn delete_auth_token(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64>;
}
