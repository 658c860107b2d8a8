//! A Postgres-backed `ChangeLogSink` writing to a single append-only
//! `auth_token_changelog` table within the caller's transaction.

use super::ChangeLogSink;
use crate::domain::metadata::ChangeLogMetadata;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

#[derive(Clone, Copy, Debug, Default)]
pub struct PostgresChangeLogSink;

impl PostgresChangeLogSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChangeLogSink for PostgresChangeLogSink {
    #[tracing::instrument(level = "debug", skip(self, tx, metadata), err)]
    async fn append(&self, tx: &mut Transaction<'_, Postgres>, metadata: &ChangeLogMetadata) -> Result<()> {
        let payload = serde_json::to_value(metadata.to_map())?;

        sqlx::query(
            r#"
            INSERT INTO auth_token_changelog (scope_id, resource_public_id, resource_type, op_type, metadata)
            VALUES ($1, $2, 'auth token', $3, $4)
            "#,
        )
        .bind(metadata.scope_id.as_str())
        .bind(metadata.resource_public_id.as_str())
        .bind(metadata.op_type.as_str())
        .bind(payload)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
