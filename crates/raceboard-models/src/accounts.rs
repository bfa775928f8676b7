use chrono::{DateTime, Utc};
use raceboard_core::Identity;
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

use crate::ids::RoleId;

/// A login account.
///
/// `password` holds a bcrypt hash and is never serialized. Accounts are
/// soft-deleted: a set `deleted_at` hides the row from every lookup.
#[derive(Clone, Serialize, FromRow, ToSchema)]
pub struct Account {
    pub account: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[sqlx(try_from = "String")]
    pub identity: Identity,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// A fresh, live account. `password_hash` must already be a bcrypt hash.
    pub fn new(
        account: impl Into<String>,
        password_hash: impl Into<String>,
        identity: Identity,
        role_id: RoleId,
    ) -> Self {
        let now = Utc::now();
        Self {
            account: account.into(),
            password: password_hash.into(),
            identity,
            role_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("account", &self.account)
            .field("identity", &self.identity)
            .field("role_id", &self.role_id)
            .field("deleted_at", &self.deleted_at)
            .finish_non_exhaustive()
    }
}
