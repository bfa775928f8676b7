//! Password hashing with bcrypt.
//!
//! Both functions are CPU-bound by design. Callers on the async runtime should
//! run them through `tokio::task::spawn_blocking`.

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {}", e)))
}
