//! Permission name constants.
//!
//! A permission's effective name is `"<resource>:<action>"`. These constants
//! cover the names the default route table gates on.
//!
//! # Example
//!
//! ```ignore
//! use raceboard_core::permissions;
//!
//! if ctx.has_permission(permissions::ROLE_ADD) {
//!     // create role
//! }
//! ```

// =============================================================================
// User permissions
// =============================================================================

pub const USER_ADD: &str = "user:add";
pub const USER_DELETE: &str = "user:delete";
pub const USER_UPDATE: &str = "user:update";
pub const USER_QUERY: &str = "user:query";

// =============================================================================
// Race permissions
// =============================================================================

pub const RACE_ADD: &str = "race:add";
pub const RACE_DELETE: &str = "race:delete";
pub const RACE_UPDATE: &str = "race:update";
pub const RACE_QUERY: &str = "race:query";

// =============================================================================
// Record permissions
// =============================================================================

pub const RECORD_ADD: &str = "record:add";
pub const RECORD_DELETE: &str = "record:delete";
pub const RECORD_UPDATE: &str = "record:update";
pub const RECORD_QUERY: &str = "record:query";

// =============================================================================
// Permission permissions
// =============================================================================

pub const PERMISSION_ADD: &str = "permission:add";
pub const PERMISSION_DELETE: &str = "permission:delete";
pub const PERMISSION_UPDATE: &str = "permission:update";
pub const PERMISSION_QUERY: &str = "permission:query";

// =============================================================================
// Role permissions
// =============================================================================

pub const ROLE_ADD: &str = "role:add";
pub const ROLE_DELETE: &str = "role:delete";
pub const ROLE_UPDATE: &str = "role:update";
pub const ROLE_QUERY: &str = "role:query";
