//! Default roles and permission matrix.

use raceboard_models::roles::permission_name;
use raceboard_models::{PermissionAction, ResourceType, RoleId};
use sqlx::PgPool;

pub const ADMIN_ROLE: RoleId = RoleId::new(1);
pub const MANAGER_ROLE: RoleId = RoleId::new(2);
pub const STUDENT_ROLE: RoleId = RoleId::new(3);
pub const TEACHER_ROLE: RoleId = RoleId::new(4);

/// `(id, label, description)`
pub const DEFAULT_ROLES: &[(RoleId, &str, &str)] = &[
    (ADMIN_ROLE, "super_admin", "Holds every permission"),
    (MANAGER_ROLE, "admin", "Competition administrator"),
    (STUDENT_ROLE, "student", "Default role of imported students"),
    (TEACHER_ROLE, "teacher", "Default role of imported teachers"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSeed {
    pub label: String,
    pub resource: ResourceType,
    pub action: PermissionAction,
}

/// One permission per `(resource, action)` pair, labelled by its name.
pub fn permission_matrix() -> Vec<PermissionSeed> {
    ResourceType::ALL
        .iter()
        .flat_map(|&resource| {
            PermissionAction::ALL.iter().map(move |&action| PermissionSeed {
                label: permission_name(resource, action),
                resource,
                action,
            })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: u64,
    pub permissions_created: u64,
    pub grants_created: u64,
}

/// Inserts the default roles and permissions and grants every permission to
/// [`ADMIN_ROLE`]. Rows that already exist are kept as they are.
pub async fn seed_rbac(pool: &PgPool) -> Result<SeedReport, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    for (id, label, description) in DEFAULT_ROLES {
        report.roles_created += sqlx::query(
            "INSERT INTO roles (id, label, description) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(*id)
        .bind(*label)
        .bind(*description)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    // Explicit ids leave the serial sequence behind.
    sqlx::query("SELECT setval(pg_get_serial_sequence('roles', 'id'), (SELECT MAX(id) FROM roles))")
        .execute(&mut *tx)
        .await?;

    for seed in permission_matrix() {
        report.permissions_created += sqlx::query(
            "INSERT INTO permissions (label, action, resource_type) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(&seed.label)
        .bind(seed.action.as_str())
        .bind(seed.resource.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    report.grants_created = sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id) \
         SELECT $1, id FROM permissions ON CONFLICT DO NOTHING",
    )
    .bind(ADMIN_ROLE)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    Ok(report)
}
