//! Expands verified session claims into an [`AuthContext`].
//!
//! The chain is account, then role, then every role-permission association,
//! then each permission. Any missing link aborts resolution: a deleted account
//! is [`AuthError::UserNotFound`], a dangling role or permission reference is a
//! referential-integrity anomaly and is logged as one. Nothing is cached.

use std::collections::BTreeSet;

use raceboard_core::AuthError;
use raceboard_db::AuthStore;
use tracing::{debug, error, instrument, warn};

use crate::claims::SessionClaims;
use crate::context::AuthContext;

#[instrument(skip(store, claims), fields(account = %claims.account))]
pub async fn resolve_identity(
    store: &dyn AuthStore,
    claims: &SessionClaims,
) -> Result<AuthContext, AuthError> {
    let Some(account) = store.find_by_account(&claims.account).await? else {
        warn!(account = %claims.account, "Session names an account that no longer exists");
        return Err(AuthError::UserNotFound(claims.account.clone()));
    };

    if account.identity != claims.identity {
        warn!(
            claimed = %claims.identity,
            stored = %account.identity,
            "Session identity differs from account record, using stored identity"
        );
    }

    let Some(role) = store.find_role_by_id(account.role_id).await? else {
        error!(
            account = %account.account,
            role_id = account.role_id.get(),
            "Account references a missing role"
        );
        return Err(AuthError::RoleNotFound(account.role_id.get()));
    };

    let associations = store.find_by_role_id(role.id).await?;
    let mut permissions = BTreeSet::new();
    for association in associations {
        let Some(permission) = store
            .find_permission_by_id(association.permission_id)
            .await?
        else {
            error!(
                role_id = role.id.get(),
                permission_id = association.permission_id.get(),
                "Role references a missing permission"
            );
            return Err(AuthError::PermissionNotFound(association.permission_id.get()));
        };
        permissions.insert(permission.name());
    }

    debug!(role = %role.label, permissions = permissions.len(), "Identity resolved");

    Ok(AuthContext {
        account: account.account,
        identity: account.identity,
        role,
        permissions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use raceboard_core::Identity;
    use raceboard_db::MemoryStore;
    use raceboard_models::{
        Account, Permission, PermissionAction, PermissionId, ResourceType, Role, RoleId,
    };

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_role(Role {
                id: RoleId::new(1),
                label: "admin".to_string(),
                description: Some("everything".to_string()),
            })
            .await;
        store
            .insert_role(Role {
                id: RoleId::new(5),
                label: "guest".to_string(),
                description: None,
            })
            .await;
        let perms = [
            (10, ResourceType::Role, PermissionAction::Add),
            (11, ResourceType::Race, PermissionAction::Query),
            (12, ResourceType::Record, PermissionAction::Delete),
        ];
        for (id, resource, action) in perms {
            store
                .insert_permission(Permission {
                    id: PermissionId::new(id),
                    label: format!("{resource} {action}"),
                    action,
                    resource,
                })
                .await;
        }
        store.grant(RoleId::new(1), PermissionId::new(10)).await;
        store.grant(RoleId::new(1), PermissionId::new(11)).await;
        store
            .insert_account(Account::new("admin", "hash", Identity::Student, RoleId::new(1)))
            .await;
        store
            .insert_account(Account::new("guest", "hash", Identity::Teacher, RoleId::new(5)))
            .await;
        store
    }

    fn claims(account: &str, identity: Identity) -> SessionClaims {
        SessionClaims::new(account, identity, u64::MAX)
    }

    #[tokio::test]
    async fn test_resolves_union_of_role_permissions() {
        let store = seeded().await;
        let ctx = resolve_identity(&store, &claims("admin", Identity::Student))
            .await
            .unwrap();

        assert_eq!(ctx.account, "admin");
        assert_eq!(ctx.identity, Identity::Student);
        assert_eq!(ctx.role.id, RoleId::new(1));
        let expected: BTreeSet<String> =
            ["role:add", "race:query"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ctx.permissions, expected);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let store = seeded().await;
        let c = claims("admin", Identity::Student);
        let first = resolve_identity(&store, &c).await.unwrap();
        let second = resolve_identity(&store, &c).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_grant_changes_visible_immediately() {
        let store = seeded().await;
        let c = claims("admin", Identity::Student);
        store.grant(RoleId::new(1), PermissionId::new(12)).await;
        store.revoke(RoleId::new(1), PermissionId::new(10)).await;

        let ctx = resolve_identity(&store, &c).await.unwrap();
        assert!(ctx.has_permission("record:delete"));
        assert!(!ctx.has_permission("role:add"));
    }

    #[tokio::test]
    async fn test_role_without_permissions_resolves_empty() {
        let store = seeded().await;
        let ctx = resolve_identity(&store, &claims("guest", Identity::Teacher))
            .await
            .unwrap();
        assert!(ctx.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_account() {
        let store = seeded().await;
        let err = resolve_identity(&store, &claims("ghost", Identity::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(ref a) if a == "ghost"));
    }

    #[tokio::test]
    async fn test_soft_deleted_account_is_missing() {
        let store = seeded().await;
        store.soft_delete_account("admin").await;
        let err = resolve_identity(&store, &claims("admin", Identity::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_dangling_role_is_hard_failure() {
        let store = seeded().await;
        store.remove_role(RoleId::new(1)).await;
        let err = resolve_identity(&store, &claims("admin", Identity::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RoleNotFound(1)));
    }

    #[tokio::test]
    async fn test_dangling_permission_is_hard_failure() {
        let store = seeded().await;
        store.remove_permission(PermissionId::new(11)).await;
        let err = resolve_identity(&store, &claims("admin", Identity::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PermissionNotFound(11)));
    }

    #[tokio::test]
    async fn test_identity_taken_from_account_record() {
        let store = seeded().await;
        let ctx = resolve_identity(&store, &claims("admin", Identity::Teacher))
            .await
            .unwrap();
        assert_eq!(ctx.identity, Identity::Student);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = seeded().await;
        store.set_unavailable(true).await;
        let err = resolve_identity(&store, &claims("admin", Identity::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }
}
