//! The coordinator: composes the minter, wrapper, store, and change-log
//! seams into the five operations embedders actually call.

use crate::adapters::store::{CreateOutcome, NewAuthToken, Reader, SearchOpts, Writer};
use crate::adapters::wrapper::Wrapper;
use crate::config::{CallOptions, RepositoryConfig};
use crate::domain::auth_token::AuthToken;
use crate::domain::ids::{AuthAccountId, IamUserId, PublicId, ScopeId};
use crate::domain::metadata::{ChangeLogMetadata, OpType};
use crate::domain::minting;
use crate::error::{RepoError, Result};
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

fn truncate_to_seconds(t: OffsetDateTime) -> OffsetDateTime {
    t.replace_nanosecond(0).unwrap_or(t)
}

/// Races `fut` against `cancel`, surfacing `RepoError::Cancelled` the moment
/// the token is cancelled rather than waiting for `fut` to finish, including
/// while `fut` is parked inside a retry backoff sleep. Cancellation observed
/// after `fut` has already committed its write does not roll anything back.
async fn with_cancellation<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(RepoError::Cancelled),
        result = fut => result,
    }
}

/// A single-task handle over the reader/writer/wrapper collaborators. Not
/// safe for concurrent use by multiple tasks at once: construct one per
/// request or worker, over shared (thread-safe) collaborators.
#[derive(Clone)]
pub struct Repository {
    reader: Arc<dyn Reader>,
    writer: Arc<dyn Writer>,
    wrapper: Arc<dyn Wrapper>,
    config: RepositoryConfig,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Repository {
    /// Builds a repository over the given collaborators. `config.default_limit`
    /// of zero or less falls back to the constant default rather than erroring:
    /// ownership makes the reader/writer/wrapper mandatory at compile time
    /// already, so there's no remaining absent-collaborator case to reject here.
    #[must_use]
    pub fn new(
        reader: Arc<dyn Reader>,
        writer: Arc<dyn Writer>,
        wrapper: Arc<dyn Wrapper>,
        mut config: RepositoryConfig,
    ) -> Self {
        if config.default_limit <= 0 {
            config.default_limit = RepositoryConfig::default().default_limit;
        }
        Self { reader, writer, wrapper, config }
    }

    fn retry_backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default().with_max_times(self.config.std_retry_count)
    }

    /// Mints, encrypts, and persists a fresh token bound to `auth_account_id`,
    /// verifying it belongs to `iam_user_id`. The only return path that
    /// carries the plaintext `token`. `cancel` is checked before the first
    /// attempt and races every retry attempt; a cancellation observed
    /// between attempts aborts the next one and surfaces `Cancelled`.
    #[tracing::instrument(skip(self, cancel), fields(public_id = tracing::field::Empty), err)]
    pub async fn create_auth_token(
        &self,
        iam_user_id: &IamUserId,
        auth_account_id: &AuthAccountId,
        cancel: &CancellationToken,
    ) -> Result<AuthToken> {
        if iam_user_id.is_empty() || auth_account_id.is_empty() {
            return Err(RepoError::InvalidParameter(
                "iam_user_id and auth_account_id must both be non-empty".to_string(),
            ));
        }
        if cancel.is_cancelled() {
            return Err(RepoError::Cancelled);
        }

        let attempt = || async {
            let plaintext = minting::new_token();
            let now = truncate_to_seconds(OffsetDateTime::now_utc());
            let expiration_time = now + self.config.max_token_lifetime;
            let (ct_token, key_id) = self.wrapper.encrypt(plaintext.as_bytes()).await?;

            let new_token = NewAuthToken {
                public_id: PublicId::from(minting::new_public_id()),
                ct_token,
                key_id,
                create_time: now,
                update_time: now,
                approximate_last_access_time: now,
                expiration_time,
            };

            let outcome = self.writer.create_auth_token(auth_account_id, iam_user_id, new_token).await?;
            Ok::<_, RepoError>((plaintext, outcome))
        };

        let (plaintext, outcome) = with_cancellation(
            cancel,
            attempt
                .retry(self.retry_backoff())
                .when(RepoError::is_retriable)
                .notify(|err, dur| tracing::warn!(error = %err, backoff = ?dur, "retrying auth token create")),
        )
        .await?;

        match outcome {
            CreateOutcome::Created(row) => {
                tracing::Span::current().record("public_id", tracing::field::display(&row.public_id));
                let mut token = row.from_writable(self.wrapper.as_ref(), false).await?;
                token.token = plaintext;
                Ok(token)
            }
            CreateOutcome::AccountNotFound => Err(RepoError::NotFound(auth_account_id.to_string())),
            CreateOutcome::Mismatch { account_id, iam_user_id } => Err(RepoError::Mismatch {
                account_id: account_id.to_string(),
                iam_user_id: iam_user_id.to_string(),
            }),
        }
    }

    /// Looks up a token by its public id. A missing row is `Ok(None)`, not
    /// an error. `ct_token` is always cleared; `token` is always cleared too,
    /// only `validate_token`'s internal lookup sees the plaintext.
    #[tracing::instrument(skip(self, cancel), err)]
    pub async fn lookup_auth_token(&self, id: &PublicId, cancel: &CancellationToken) -> Result<Option<AuthToken>> {
        if id.is_empty() {
            return Err(RepoError::InvalidParameter("id must be non-empty".to_string()));
        }
        if cancel.is_cancelled() {
            return Err(RepoError::Cancelled);
        }
        with_cancellation(cancel, self.lookup_internal(id, false)).await
    }

    async fn lookup_internal(&self, id: &PublicId, with_token_value: bool) -> Result<Option<AuthToken>> {
        let Some(row) = self.reader.lookup_auth_token(id).await? else {
            return Ok(None);
        };
        let token = row.from_writable(self.wrapper.as_ref(), with_token_value).await?;
        Ok(Some(token))
    }

    /// The hot path: look up, check expiration/staleness, compare the
    /// presented secret, coalesce a last-access bump, and return a sanitized
    /// value. Never logs or returns the presented token.
    #[tracing::instrument(skip(self, presented_token, cancel), err)]
    pub async fn validate_token(
        &self,
        id: &PublicId,
        presented_token: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<AuthToken>> {
        if id.is_empty() {
            return Err(RepoError::InvalidParameter("id must be non-empty".to_string()));
        }
        if presented_token.is_empty() {
            return Err(RepoError::InvalidParameter("presented_token must be non-empty".to_string()));
        }
        if cancel.is_cancelled() {
            return Err(RepoError::Cancelled);
        }

        with_cancellation(cancel, async {
            let Some(mut token) = self.lookup_internal(id, true).await? else {
                return Ok(None);
            };

            let now = OffsetDateTime::now_utc();

            if !token.is_valid(now, self.config.max_staleness) {
                let metadata =
                    ChangeLogMetadata::new(token.scope_id.clone(), token.public_id.clone(), OpType::Delete);
                self.delete_row(id, metadata).await?;
                return Ok(None);
            }

            if token.token != presented_token {
                return Ok(None);
            }

            if now - token.approximate_last_access_time >= self.config.last_access_update_duration {
                let metadata =
                    ChangeLogMetadata::new(token.scope_id.clone(), token.public_id.clone(), OpType::Update);
                self.bump_last_access(id, metadata).await?;
            }

            token.sanitize();
            Ok(Some(token))
        })
        .await
    }

    /// Bounded search for tokens whose `scope_id` matches, most recent first.
    #[tracing::instrument(skip(self, cancel), err)]
    pub async fn list_auth_tokens(
        &self,
        scope_id: &ScopeId,
        opts: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<AuthToken>> {
        if scope_id.is_empty() {
            return Err(RepoError::InvalidParameter("scope_id must be non-empty".to_string()));
        }
        if cancel.is_cancelled() {
            return Err(RepoError::Cancelled);
        }

        with_cancellation(cancel, async {
            let limit = opts.limit.unwrap_or(self.config.default_limit);
            let rows = self
                .reader
                .search_auth_tokens_by_scope(scope_id, SearchOpts { limit: Some(limit) })
                .await?;

            let mut tokens = Vec::with_capacity(rows.len());
            for row in rows {
                tokens.push(row.from_writable(self.wrapper.as_ref(), false).await?);
            }
            Ok(tokens)
        })
        .await
    }

    /// Deletes a token by public id. A missing row returns `Ok(0)`, not an
    /// error.
    #[tracing::instrument(skip(self, cancel), err)]
    pub async fn delete_auth_token(&self, id: &PublicId, cancel: &CancellationToken) -> Result<u64> {
        if id.is_empty() {
            return Err(RepoError::InvalidParameter("id must be non-empty".to_string()));
        }
        if cancel.is_cancelled() {
            return Err(RepoError::Cancelled);
        }

        with_cancellation(cancel, async {
            let Some(row) = self.reader.lookup_auth_token(id).await? else {
                return Ok(0);
            };

            let metadata = ChangeLogMetadata::new(row.scope_id, row.public_id, OpType::Delete);
            self.delete_row(id, metadata).await
        })
        .await
    }

    async fn delete_row(&self, id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        let rows = (|| self.writer.delete_auth_token(id, metadata.clone()))
            .retry(self.retry_backoff())
            .when(RepoError::is_retriable)
            .notify(|err, dur| tracing::warn!(error = %err, backoff = ?dur, "retrying auth token delete"))
            .await?;

        if rows > 1 {
            return Err(RepoError::MultipleRecords);
        }
        Ok(rows)
    }

    async fn bump_last_access(&self, id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        let rows = (|| self.writer.update_last_access(id, metadata.clone()))
            .retry(self.retry_backoff())
            .when(RepoError::is_retriable)
            .notify(|err, dur| tracing::warn!(error = %err, backoff = ?dur, "retrying last-access update"))
            .await?;

        if rows > 1 {
            return Err(RepoError::MultipleRecords);
        }
        Ok(rows)
    }
}
