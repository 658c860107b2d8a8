//! Repository tunables.
//!
//! This crate ships no binary and so owns no CLI/env config layer; its
//! tunables are a plain struct an embedding application constructs (from its
//! own config layer, env, or hardcoded) and passes to
//! [`crate::services::auth_token_repository::Repository::new`].

use time::Duration;

const DEFAULT_MAX_TOKEN_LIFETIME_DAYS: i64 = 7;
const DEFAULT_MAX_STALENESS_HOURS: i64 = 24;
const DEFAULT_LAST_ACCESS_UPDATE_MINUTES: i64 = 10;
const DEFAULT_STD_RETRY_COUNT: usize = 3;
const DEFAULT_LIMIT: i64 = 100;

#[derive(Clone, Debug)]
pub struct RepositoryConfig {
    /// Absolute lifetime of a minted token from its creation commit time.
    pub max_token_lifetime: Duration,
    /// Idle window past which a token is considered stale even if unexpired.
    pub max_staleness: Duration,
    /// Minimum gap between last-access writes for the same token.
    pub last_access_update_duration: Duration,
    /// Retry budget for retriable store failures during mutations.
    pub std_retry_count: usize,
    /// Default row limit for `list_auth_tokens` when a call doesn't override it.
    pub default_limit: i64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            max_token_lifetime: Duration::days(DEFAULT_MAX_TOKEN_LIFETIME_DAYS),
            max_staleness: Duration::hours(DEFAULT_MAX_STALENESS_HOURS),
            last_access_update_duration: Duration::minutes(DEFAULT_LAST_ACCESS_UPDATE_MINUTES),
            std_retry_count: DEFAULT_STD_RETRY_COUNT,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Per-call override for `list_auth_tokens`. `None` defers to the
/// repository's `default_limit`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallOptions {
    pub limit: Option<i64>,
}

impl CallOptions {
    #[must_use]
    pub const fn with_limit(limit: i64) -> Self {
        Self { limit: Some(limit) }
    }
}
