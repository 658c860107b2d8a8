//! Error kinds for the auth-token repository core.
//!
//! One variant per error kind in the design's error taxonomy. `Store` wraps
//! the underlying `sqlx::Error` directly; callers that need to decide
//! whether to retry should consult [`RepoError::is_retriable`] rather than
//! matching on the wrapped error themselves.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("auth account {account_id} does not belong to iam user {iam_user_id}")]
    Mismatch { account_id: String, iam_user_id: String },

    #[error("crypto operation failed")]
    Crypto,

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("change-log metadata could not be encoded: {0}")]
    ChangeLogEncoding(#[from] serde_json::Error),

    #[error("mutation affected more than one record")]
    MultipleRecords,

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, RepoError>;

impl RepoError {
    /// Whether the transaction envelope should retry the attempt that
    /// produced this error. Only transient store failures are retriable:
    /// serialization failures (SQLSTATE 40001) from concurrent transactions
    /// and unique-violations (SQLSTATE 23505) on the minted `public_id`,
    /// which the caller re-mints before the next attempt (see
    /// `domain::minting`).
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Store(sqlx::Error::Database(db_err)) => {
                matches!(db_err.code().as_deref(), Some("40001") | Some("23505"))
            }
            _ => false,
        }
    }
}
