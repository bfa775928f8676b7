//! Request-scoped authorization context.

use std::collections::BTreeSet;

use raceboard_core::Identity;
use raceboard_models::Role;
use serde::Serialize;
use utoipa::ToSchema;

/// Who is calling and what they may do, rebuilt from the store on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthContext {
    pub account: String,
    pub identity: Identity,
    pub role: Role,
    /// Effective `"type:action"` names granted through the role.
    #[schema(value_type = Vec<String>)]
    pub permissions: BTreeSet<String>,
}

impl AuthContext {
    /// Exact-string membership. No wildcards or hierarchy.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
