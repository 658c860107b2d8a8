//! Change-log metadata shaping.
//!
//! A typed struct in place of a bare string-keyed map, so call sites can't
//! typo a key, while [`ChangeLogMetadata::to_map`] still gives a pluggable
//! sink the untyped four-key shape (`scope-id`, `resource-public-id`,
//! `resource-type`, `op-type`) an external oplog consumer expects.

use crate::domain::ids::{PublicId, ScopeId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OpType {
    Create,
    Update,
    Delete,
}

impl OpType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChangeLogMetadata {
    pub scope_id: ScopeId,
    pub resource_public_id: PublicId,
    pub op_type: OpType,
}

impl ChangeLogMetadata {
    #[must_use]
    pub fn new(scope_id: ScopeId, resource_public_id: PublicId, op_type: OpType) -> Self {
        Self { scope_id, resource_public_id, op_type }
    }

    /// Renders the record in the untyped four-key wire shape, for sinks
    /// that don't know about the typed struct.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map = BTreeMap::new();
        map.insert("scope-id", vec![self.scope_id.to_string()]);
        map.insert("resource-public-id", vec![self.resource_public_id.to_string()]);
        map.insert("resource-type", vec!["auth token".to_string()]);
        map.insert("op-type", vec![self.op_type.as_str().to_string()]);
        map
    }
}
