//! Account administration.

use raceboard_core::{AppError, Identity, hash_password};
use raceboard_models::RoleId;
use sqlx::PgPool;

use crate::rbac::{ADMIN_ROLE, STUDENT_ROLE, TEACHER_ROLE};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account `{0}` already exists")]
    AlreadyExists(String),
    #[error("role {0} does not exist")]
    UnknownRole(RoleId),
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        AccountError::Hash(err.error.to_string())
    }
}

/// Role an imported roster row receives.
///
/// Students get the student role except the roster's `admin` row, which gets
/// the administrator role. Teachers get the teacher role.
pub fn default_role_for(identity: Identity, account: &str) -> RoleId {
    match identity {
        Identity::Student if account == "admin" => ADMIN_ROLE,
        Identity::Student => STUDENT_ROLE,
        Identity::Teacher => TEACHER_ROLE,
    }
}

/// Inserts one account with a freshly hashed password.
pub async fn create_account(
    pool: &PgPool,
    account: &str,
    password: &str,
    identity: Identity,
    role_id: RoleId,
) -> Result<(), AccountError> {
    let exists: Option<(String,)> = sqlx::query_as("SELECT account FROM accounts WHERE account = $1")
        .bind(account)
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(AccountError::AlreadyExists(account.to_string()));
    }

    let role: Option<(i32,)> = sqlx::query_as("SELECT id FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(pool)
        .await?;
    if role.is_none() {
        return Err(AccountError::UnknownRole(role_id));
    }

    let hashed = hash_password(password)?;

    sqlx::query(
        "INSERT INTO accounts (account, password, identity, role_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(account)
    .bind(&hashed)
    .bind(identity.as_str())
    .bind(role_id)
    .execute(pool)
    .await?;

    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub students_imported: u64,
    pub teachers_imported: u64,
    pub skipped: u64,
}

/// Copies every student and teacher roster row without an account into
/// `accounts`. Roster passwords are already bcrypt hashes and are copied as is.
/// Existing accounts, live or soft-deleted, are left untouched.
pub async fn sync_accounts(pool: &PgPool) -> Result<SyncReport, AccountError> {
    let mut tx = pool.begin().await?;
    let mut report = SyncReport::default();

    let students: Vec<(String, String)> = sqlx::query_as("SELECT sid, password FROM students")
        .fetch_all(&mut *tx)
        .await?;
    let teachers: Vec<(String, String)> = sqlx::query_as("SELECT tid, password FROM teachers")
        .fetch_all(&mut *tx)
        .await?;

    let rows = students
        .into_iter()
        .map(|row| (Identity::Student, row))
        .chain(teachers.into_iter().map(|row| (Identity::Teacher, row)));

    for (identity, (account, password)) in rows {
        let inserted = sqlx::query(
            "INSERT INTO accounts (account, password, identity, role_id) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (account) DO NOTHING",
        )
        .bind(&account)
        .bind(&password)
        .bind(identity.as_str())
        .bind(default_role_for(identity, &account))
        .execute(&mut *tx)
        .await?
        .rows_affected();

        match (inserted, identity) {
            (0, _) => report.skipped += 1,
            (_, Identity::Student) => report.students_imported += 1,
            (_, Identity::Teacher) => report.teachers_imported += 1,
        }
    }

    tx.commit().await?;
    Ok(report)
}
