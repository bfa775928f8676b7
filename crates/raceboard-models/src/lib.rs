//! # Raceboard Models
//!
//! Domain models and DTOs for the Raceboard API.
//!
//! - [`ids`]: Strongly-typed integer ids for roles and permissions
//! - [`accounts`]: Login accounts (students and teachers)
//! - [`roles`]: Roles, permissions and the role-permission join
//! - [`auth`]: Login and captcha request/response DTOs

pub mod accounts;
pub mod auth;
pub mod ids;
pub mod roles;

pub use accounts::Account;
pub use ids::{PermissionId, RoleId};
pub use roles::{Permission, PermissionAction, ResourceType, Role, RolePermission};
