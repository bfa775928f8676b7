//! # Raceboard Core
//!
//! Core types, errors, and utilities for the Raceboard API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: HTTP error envelope ([`AppError`]) and the authentication
//!   pipeline taxonomy ([`AuthError`])
//! - [`identity`]: The closed set of account identity classes
//! - [`password`]: Password hashing and verification
//! - [`permissions`]: Permission name constants (`"type:action"`)
//!
//! # Example
//!
//! ```ignore
//! use raceboard_core::{AuthError, Identity, hash_password, verify_password};
//!
//! let hash = hash_password("secret")?;
//! assert!(verify_password("secret", &hash)?);
//!
//! let identity: Identity = "teacher".parse()?;
//! ```

pub mod errors;
pub mod identity;
pub mod password;
pub mod permissions;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use identity::Identity;
pub use password::{hash_password, verify_password};
