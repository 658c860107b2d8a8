//! The change-log sink seam: every row create/update/delete is paired,
//! inside the same transaction as the row write, with an append here.
//!
//! `ChangeLogSink` is kept separate from [`crate::adapters::store::Writer`]
//! so the concrete Postgres adapter can compose a generic, reusable sink
//! implementation with whatever row-specific SQL each `Writer` method needs,
//! rather than duplicating the append logic per method.

pub mod postgres;

use crate::domain::metadata::ChangeLogMetadata;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

/// Appends a change-log entry as part of an in-flight transaction. A
/// failure here must fail the whole transaction, callers should propagate
/// the error rather than swallow it.
#[async_trait]
pub trait ChangeLogSink: Send + Sync {
    async fn append(&self, tx: &mut Transaction<'_, Postgres>, metadata: &ChangeLogMetadata) -> Result<()>;
}
