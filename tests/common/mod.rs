#![allow(dead_code)]

use async_trait::async_trait;
use authtoken_core::adapters::store::{AuthAccount, CreateOutcome, NewAuthToken, Reader, SearchOpts, Writer};
use authtoken_core::domain::auth_token::AuthTokenRow;
use authtoken_core::domain::ids::{AuthAccountId, AuthMethodId, IamUserId, PublicId, ScopeId};
use authtoken_core::domain::metadata::{ChangeLogMetadata, OpType};
use authtoken_core::{RepoError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

/// An in-memory `Reader`/`Writer` pair over plain maps, standing in for a
/// real transactional store in tests that don't need one.
#[derive(Clone, Default)]
pub struct FakeStore(Arc<Mutex<StoreState>>);

#[derive(Default)]
struct StoreState {
    accounts: HashMap<String, AuthAccount>,
    tokens: HashMap<String, AuthTokenRow>,
    changelog: Vec<ChangeLogMetadata>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(&self, account: AuthAccount) {
        self.0.lock().unwrap().accounts.insert(account.public_id.as_str().to_string(), account);
    }

    pub fn changelog(&self) -> Vec<ChangeLogMetadata> {
        self.0.lock().unwrap().changelog.clone()
    }

    pub fn row_count(&self) -> usize {
        self.0.lock().unwrap().tokens.len()
    }
}

#[async_trait]
impl Reader for FakeStore {
    async fn lookup_auth_token(&self, id: &PublicId) -> Result<Option<AuthTokenRow>> {
        Ok(self.0.lock().unwrap().tokens.get(id.as_str()).cloned())
    }

    async fn lookup_auth_account(&self, id: &AuthAccountId) -> Result<Option<AuthAccount>> {
        Ok(self.0.lock().unwrap().accounts.get(id.as_str()).cloned())
    }

    async fn search_auth_tokens_by_scope(
        &self,
        scope_id: &ScopeId,
        opts: SearchOpts,
    ) -> Result<Vec<AuthTokenRow>> {
        let state = self.0.lock().unwrap();
        let mut rows: Vec<_> = state.tokens.values().filter(|r| &r.scope_id == scope_id).cloned().collect();
        rows.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        let limit = usize::try_from(opts.limit.unwrap_or(100)).unwrap_or(usize::MAX);
        rows.truncate(limit);
        Ok(rows)
    }
}

#[async_trait]
impl Writer for FakeStore {
    async fn create_auth_token(
        &self,
        auth_account_id: &AuthAccountId,
        expected_iam_user_id: &IamUserId,
        new_token: NewAuthToken,
    ) -> Result<CreateOutcome> {
        let mut state = self.0.lock().unwrap();

        let Some(account) = state.accounts.get(auth_account_id.as_str()).cloned() else {
            return Ok(CreateOutcome::AccountNotFound);
        };

        if &account.iam_user_id != expected_iam_user_id {
            return Ok(CreateOutcome::Mismatch {
                account_id: auth_account_id.clone(),
                iam_user_id: expected_iam_user_id.clone(),
            });
        }

        let row = AuthTokenRow {
            public_id: new_token.public_id.clone(),
            ct_token: new_token.ct_token,
            key_id: new_token.key_id,
            auth_account_id: auth_account_id.clone(),
            iam_user_id: account.iam_user_id.clone(),
            scope_id: account.scope_id.clone(),
            auth_method_id: account.auth_method_id.clone(),
            create_time: new_token.create_time,
            update_time: new_token.update_time,
            approximate_last_access_time: new_token.approximate_last_access_time,
            expiration_time: new_token.expiration_time,
        };

        state.tokens.insert(row.public_id.as_str().to_string(), row.clone());
        state.changelog.push(ChangeLogMetadata::new(row.scope_id.clone(), row.public_id.clone(), OpType::Create));

        Ok(CreateOutcome::Created(row))
    }

    async fn update_last_access(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        let mut state = self.0.lock().unwrap();
        let Some(row) = state.tokens.get_mut(public_id.as_str()) else {
            return Ok(0);
        };
        row.approximate_last_access_time = OffsetDateTime::now_utc();
        row.update_time = row.approximate_last_access_time;
        state.changelog.push(metadata);
        Ok(1)
    }

    async fn delete_auth_token(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        let mut state = self.0.lock().unwrap();
        if state.tokens.remove(public_id.as_str()).is_some() {
            state.changelog.push(metadata);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// A `Writer` wrapper that forces its delete path to fail with a store
/// error, ignoring whatever the inner store would have done, used to
/// exercise the "surface, don't swallow" path on the invalidating delete.
#[derive(Clone)]
pub struct FailingWriter {
    pub inner: FakeStore,
    pub fail_delete: bool,
}

#[async_trait]
impl Writer for FailingWriter {
    async fn create_auth_token(
        &self,
        auth_account_id: &AuthAccountId,
        expected_iam_user_id: &IamUserId,
        new_token: NewAuthToken,
    ) -> Result<CreateOutcome> {
        self.inner.create_auth_token(auth_account_id, expected_iam_user_id, new_token).await
    }

    async fn update_last_access(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        self.inner.update_last_access(public_id, metadata).await
    }

    async fn delete_auth_token(&self, public_id: &PublicId, metadata: ChangeLogMetadata) -> Result<u64> {
        if self.fail_delete {
            return Err(RepoError::Store(sqlx::Error::PoolClosed));
        }
        self.inner.delete_auth_token(public_id, metadata).await
    }
}

pub fn sample_account(iam_user_id: &str, scope_id: &str) -> AuthAccount {
    AuthAccount {
        public_id: AuthAccountId::from("aa_1"),
        iam_user_id: IamUserId::from(iam_user_id),
        scope_id: ScopeId::from(scope_id),
        auth_method_id: AuthMethodId::from("am_1"),
    }
}
