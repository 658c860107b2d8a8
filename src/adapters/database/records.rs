//! Row shapes as `sqlx` sees them, one level below the domain types in
//! [`crate::domain`]. Kept separate so a column rename or added column only
//! touches this file and the `From` conversions below it.

use crate::adapters::store::AuthAccount;
use crate::domain::auth_token::AuthTokenRow;
use crate::domain::ids::{AuthAccountId, AuthMethodId, IamUserId, KeyId, PublicId, ScopeId};
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct AuthTokenRecord {
    pub public_id: String,
    pub ct_token: Vec<u8>,
    pub key_id: String,
    pub auth_account_id: String,
    pub iam_user_id: String,
    pub scope_id: String,
    pub auth_method_id: String,
    pub create_time: OffsetDateTime,
    pub update_time: OffsetDateTime,
    pub approximate_last_access_time: OffsetDateTime,
    pub expiration_time: OffsetDateTime,
}

impl From<AuthTokenRecord> for AuthTokenRow {
    fn from(r: AuthTokenRecord) -> Self {
        Self {
            public_id: PublicId::from(r.public_id),
            ct_token: r.ct_token,
            key_id: KeyId::from(r.key_id),
            auth_account_id: AuthAccountId::from(r.auth_account_id),
            iam_user_id: IamUserId::from(r.iam_user_id),
            scope_id: ScopeId::from(r.scope_id),
            auth_method_id: AuthMethodId::from(r.auth_method_id),
            create_time: r.create_time,
            update_time: r.update_time,
            approximate_last_access_time: r.approximate_last_access_time,
            expiration_time: r.expiration_time,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct AuthAccountRecord {
    pub public_id: String,
    pub iam_user_id: String,
    pub scope_id: String,
    pub auth_method_id: String,
}

impl From<AuthAccountRecord> for AuthAccount {
    fn from(r: AuthAccountRecord) -> Self {
        Self {
            public_id: AuthAccountId::from(r.public_id),
            iam_user_id: IamUserId::from(r.iam_user_id),
            scope_id: ScopeId::from(r.scope_id),
            auth_method_id: AuthMethodId::from(r.auth_method_id),
        }
    }
}
