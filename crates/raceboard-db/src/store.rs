//! Lookup interfaces the authentication pipeline depends on.
//!
//! Each trait is a plain keyed lookup with no business logic. Absence is
//! reported as `Ok(None)` (or an empty list); `Err` means the store itself
//! failed.

use async_trait::async_trait;
use raceboard_core::{AuthError, Identity};
use raceboard_models::{Account, Permission, PermissionId, Role, RoleId, RolePermission};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err.into())
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Live account with the given id and identity class.
    async fn find_by_account_and_identity(
        &self,
        account: &str,
        identity: Identity,
    ) -> Result<Option<Account>, StoreError>;

    /// Live account with the given id, whatever its identity class.
    async fn find_by_account(&self, account: &str) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, StoreError>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_permission_by_id(
        &self,
        id: PermissionId,
    ) -> Result<Option<Permission>, StoreError>;
}

#[async_trait]
pub trait RolePermissionStore: Send + Sync {
    /// All associations of a role; empty when the role holds no permissions.
    async fn find_by_role_id(&self, role_id: RoleId) -> Result<Vec<RolePermission>, StoreError>;
}

/// Everything the login and session pipeline reads.
pub trait AuthStore: AccountStore + RoleStore + PermissionStore + RolePermissionStore {}

impl<T> AuthStore for T where T: AccountStore + RoleStore + PermissionStore + RolePermissionStore {}
