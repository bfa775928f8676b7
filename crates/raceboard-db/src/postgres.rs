//! PostgreSQL-backed store.
//!
//! Every lookup is a single indexed query against the shared pool. Soft-deleted
//! accounts are filtered out in SQL so callers never see them.

use async_trait::async_trait;
use raceboard_core::Identity;
use raceboard_models::{Account, Permission, PermissionId, Role, RoleId, RolePermission};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;

use crate::store::{AccountStore, PermissionStore, RolePermissionStore, RoleStore, StoreError};

/// Initializes a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and is shared by every request.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const ACCOUNT_COLUMNS: &str =
    "account, password, identity, role_id, created_at, updated_at, deleted_at";

#[async_trait]
impl AccountStore for PgStore {
    #[instrument(skip(self))]
    async fn find_by_account_and_identity(
        &self,
        account: &str,
        identity: Identity,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             WHERE account = $1 AND identity = $2 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, Account>(&query)
            .bind(account)
            .bind(identity.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn find_by_account(&self, account: &str) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, Account>(&query)
            .bind(account)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl RoleStore for PgStore {
    #[instrument(skip(self))]
    async fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query_as::<_, Role>("SELECT id, label, description FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl PermissionStore for PgStore {
    #[instrument(skip(self))]
    async fn find_permission_by_id(
        &self,
        id: PermissionId,
    ) -> Result<Option<Permission>, StoreError> {
        let row = sqlx::query_as::<_, Permission>(
            "SELECT id, label, action, resource_type FROM permissions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl RolePermissionStore for PgStore {
    #[instrument(skip(self))]
    async fn find_by_role_id(&self, role_id: RoleId) -> Result<Vec<RolePermission>, StoreError> {
        let rows = sqlx::query_as::<_, RolePermission>(
            "SELECT role_id, permission_id FROM role_permissions WHERE role_id = $1",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
