use super::DbPool;
use super::records::{AuthAccountRecord, AuthTokenRecord};
use crate::adapters::changelog::ChangeLogSink;
use crate::adapters::store::{AuthAccount, CreateOutcome, NewAuthToken, Reader, SearchOpts, Writer};
use crate::domain::auth_token::AuthTokenRow;
use crate::domain::ids::{AuthAccountId, IamUserId, PublicId, ScopeId};
use crate::domain::metadata::{ChangeLogMetadata, OpType};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The concrete `Reader`/`Writer` pair, backed by a single Postgres schema:
/// `auth_account` (read-only here), `auth_token`, and `auth_token_changelog`.
#[derive(Clone)]
pub struct AuthTokenRepo {
    pool: DbPool,
    changelog: Arc<dyn ChangeLogSink>,
}

impl std::fmt::Debug for AuthTokenRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokenRepo").finish_non_exhaustive()
    }
}

impl AuthTokenRepo {
    #[must_use]
    pub fn new(pool: DbPool, changelog: Arc<dyn ChangeLogSink>) -> Self {
        Self { pool, changelog }
    }
}

#[async_trait]
impl Reader for AuthTokenRepo {
    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn lookup_auth_token(&self, id: &PublicId) -> Result<Option<AuthTokenRow>> {
        let record = sqlx::query_as::<_, AuthTokenRecord>(
            r#"
            SELECT public_id, ct_token, key_id, auth_account_id, iam_user_id, scope_id,
                   auth_method_id, create_time, update_time, approximate_last_access_time,
                   expiration_time
            FROM auth_token
            WHERE public_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(AuthTokenRow::from))
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn lookup_auth_account(&self, id: &AuthAccountId) -> Result<Option<AuthAccount>> {
        let record = sqlx::query_as::<_, AuthAccountRecord>(
            r#"
            SELECT public_id, iam_user_id, scope_id, auth_method_id
            FROM auth_account
            WHERE public_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(AuthAccount::from))
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn search_auth_tokens_by_scope(
        &self,
        scope_id: &ScopeId,
        opts: SearchOpts,
    ) -> Result<Vec<AuthTokenRow>> {
        let limit = opts.limit.unwrap_or(100);

        let records = sqlx::query_as::<_, AuthTokenRecord>(
            r#"
            SELECT public_id, ct_token, key_id, auth_account_id, iam_user_id, scope_id,
                   auth_method_id, create_time, update_time, approximate_last_access_time,
                   expiration_time
            FROM auth_token
            WHERE scope_id = $1
            ORDER BY create_time DESC
            LIMIT $2
            "#,
        )
        .bind(scope_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(AuthTokenRow::from).collect())
    }
}

#[async_trait]
impl Writer for AuthTokenRepo {
    #[tracing::instrument(level = "debug", skip(self, new_token), err)]
    async fn create_auth_token(
        &self,
        auth_account_id: &AuthAccountId,
        expected_iam_user_id: &IamUserId,
        new_token: NewAuthToken,
    ) -> Result<CreateOutcome> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, AuthAccountRecord>(
            r#"
            SELECT public_id, iam_user_id, scope_id, auth_method_id
            FROM auth_account
            WHERE public_id = $1
            "#,
        )
        .bind(auth_account_id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(account) = account else {
            return Ok(CreateOutcome::AccountNotFound);
        };

        if account.iam_user_id != expected_iam_user_id.as_str() {
            return Ok(CreateOutcome::Mismatch {
                account_id: auth_account_id.clone(),
                iam_user_id: expected_iam_user_id.clone(),
            });
        }

        let record = sqlx::query_as::<_, AuthTokenRecord>(
            r#"
            INSERT INTO auth_token
                (public_id, ct_token, key_id, auth_account_id, iam_user_id, scope_id,
                 auth_method_id, create_time, update_time, approximate_last_access_time,
                 expiration_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING public_id, ct_token, key_id, auth_account_id, iam_user_id, scope_id,
                      auth_method_id, create_time, update_time, approximate_last_access_time,
                      expiration_time
            "#,
        )
        .bind(new_token.public_id.as_str())
        .bind(&new_token.ct_token)
        .bind(new_token.key_id.as_str())
        .bind(auth_account_id.as_str())
        .bind(account.iam_user_id.as_str())
        .bind(account.scope_id.as_str())
        .bind(account.auth_method_id.as_str())
        .bind(new_token.create_time)
        .bind(new_token.update_time)
        .bind(new_token.approximate_last_access_time)
        .bind(new_token.expiration_time)
        .fetch_one(&mut *tx)
        .await?;

        let metadata = ChangeLogMetadata::new(
            ScopeId::from(account.scope_id.clone()),
            new_token.public_id.clone(),
            OpType::Create,
        );
        self.changelog.append(&mut tx, &metadata).await?;

        tx.commit().await?;

        Ok(CreateOutcome::Created(AuthTokenRow::from(record)))
    }

    #[tracing::instrument(level = "debug", skip(self, metadata), err)]
    async fn update_last_access(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE auth_token
            SET approximate_last_access_time = DEFAULT, update_time = DEFAULT
            WHERE public_id = $1
            "#,
        )
        .bind(public_id.as_str())
        .execute(&mut *tx)
        .await?;

        let rows = result.rows_affected();
        if rows > 0 {
            self.changelog.append(&mut tx, &metadata).await?;
        }

        tx.commit().await?;
        Ok(rows)
    }

    #[tracing::instrument(level = "debug", skip(self, metadata), err)]
    async fn delete_auth_token(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM auth_token WHERE public_id = $1")
            .bind(public_id.as_str())
            .execute(&mut *tx)
            .await?;

        let rows = result.rows_affected();
        if rows > 0 {
            self.changelog.append(&mut tx, &metadata).await?;
        }

        tx.commit().await?;
        Ok(rows)
    }
}
