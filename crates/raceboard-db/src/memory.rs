//! In-memory store.
//!
//! Holds accounts, roles, permissions and grants in maps behind one async
//! `RwLock`. Removing a role or permission leaves dangling references in
//! place, the same way a careless delete would in the real database, so the
//! resolver's integrity checks can be exercised.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use raceboard_core::Identity;
use raceboard_models::{Account, Permission, PermissionId, Role, RoleId, RolePermission};
use tokio::sync::RwLock;

use crate::store::{AccountStore, PermissionStore, RolePermissionStore, RoleStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
    grants: BTreeSet<(RoleId, PermissionId)>,
    unavailable: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_account(&self, account: Account) {
        let mut inner = self.inner.write().await;
        inner.accounts.insert(account.account.clone(), account);
    }

    /// Marks an account deleted. Returns `false` if it was unknown.
    pub async fn soft_delete_account(&self, account: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(account) {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Points an account at another role.
    pub async fn assign_role(&self, account: &str, role_id: RoleId) -> bool {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(account) {
            Some(row) => {
                row.role_id = role_id;
                row.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub async fn insert_role(&self, role: Role) {
        self.inner.write().await.roles.insert(role.id, role);
    }

    pub async fn remove_role(&self, id: RoleId) -> Option<Role> {
        self.inner.write().await.roles.remove(&id)
    }

    pub async fn insert_permission(&self, permission: Permission) {
        let mut inner = self.inner.write().await;
        inner.permissions.insert(permission.id, permission);
    }

    pub async fn remove_permission(&self, id: PermissionId) -> Option<Permission> {
        self.inner.write().await.permissions.remove(&id)
    }

    pub async fn grant(&self, role_id: RoleId, permission_id: PermissionId) {
        self.inner.write().await.grants.insert((role_id, permission_id));
    }

    pub async fn revoke(&self, role_id: RoleId, permission_id: PermissionId) -> bool {
        self.inner.write().await.grants.remove(&(role_id, permission_id))
    }

    /// Replaces every grant of a role in one step.
    pub async fn replace_grants(&self, role_id: RoleId, permission_ids: &[PermissionId]) {
        let mut inner = self.inner.write().await;
        inner.grants.retain(|(role, _)| *role != role_id);
        inner
            .grants
            .extend(permission_ids.iter().map(|permission| (role_id, *permission)));
    }

    /// Makes every lookup fail, simulating a lost database connection.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }
}

fn check(inner: &Inner) -> Result<(), StoreError> {
    if inner.unavailable {
        return Err(StoreError::Unavailable("memory store disabled".to_string()));
    }
    Ok(())
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_account_and_identity(
        &self,
        account: &str,
        identity: Identity,
    ) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        check(&inner)?;
        Ok(inner
            .accounts
            .get(account)
            .filter(|row| !row.is_deleted() && row.identity == identity)
            .cloned())
    }

    async fn find_by_account(&self, account: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        check(&inner)?;
        Ok(inner
            .accounts
            .get(account)
            .filter(|row| !row.is_deleted())
            .cloned())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        let inner = self.inner.read().await;
        check(&inner)?;
        Ok(inner.roles.get(&id).cloned())
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_permission_by_id(
        &self,
        id: PermissionId,
    ) -> Result<Option<Permission>, StoreError> {
        let inner = self.inner.read().await;
        check(&inner)?;
        Ok(inner.permissions.get(&id).cloned())
    }
}

#[async_trait]
impl RolePermissionStore for MemoryStore {
    async fn find_by_role_id(&self, role_id: RoleId) -> Result<Vec<RolePermission>, StoreError> {
        let inner = self.inner.read().await;
        check(&inner)?;
        Ok(inner
            .grants
            .iter()
            .filter(|(role, _)| *role == role_id)
            .map(|(role, permission)| RolePermission {
                role_id: *role,
                permission_id: *permission,
            })
            .collect())
    }
}
