//! Route-to-permission authorization.
//!
//! The gate holds a table of path prefixes, each naming the permission a
//! caller must hold. A request path is matched against every prefix and the
//! longest matching prefix decides. Paths matching nothing are handled by the
//! configured [`UnmappedRoutePolicy`].
//!
//! The table is built once at startup and only read afterwards.

use raceboard_config::UnmappedRoutePolicy;
use raceboard_core::{AuthError, permissions};

use crate::context::AuthContext;

/// Routes gated out of the box, as `(prefix, permission)`.
pub const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("/user/add", permissions::USER_ADD),
    ("/user/delete", permissions::USER_DELETE),
    ("/user/reset", permissions::USER_UPDATE),
    ("/user/list", permissions::USER_QUERY),
    ("/race/add", permissions::RACE_ADD),
    ("/race/delete", permissions::RACE_DELETE),
    ("/race/update", permissions::RACE_UPDATE),
    ("/race/list", permissions::RACE_QUERY),
    ("/record/add", permissions::RECORD_ADD),
    ("/record/delete", permissions::RECORD_DELETE),
    ("/record/list", permissions::RECORD_QUERY),
    ("/permission/add", permissions::PERMISSION_ADD),
    ("/permission/delete", permissions::PERMISSION_DELETE),
    ("/permission/update", permissions::PERMISSION_UPDATE),
    ("/permission/list", permissions::PERMISSION_QUERY),
    ("/role/add", permissions::ROLE_ADD),
    ("/role/delete", permissions::ROLE_DELETE),
    ("/role/update", permissions::ROLE_UPDATE),
    ("/role/list", permissions::ROLE_QUERY),
    ("/role/grant", permissions::ROLE_UPDATE),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The route requires a permission the caller lacks.
    MissingPermission(String),
    /// The route has no table entry and the policy is deny.
    UnmappedRoute,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

#[derive(Debug, Clone)]
struct RouteRule {
    prefix: String,
    permission: String,
}

#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    /// Sorted by descending prefix length so the first hit is the longest.
    rules: Vec<RouteRule>,
    unmapped: UnmappedRoutePolicy,
}

impl AuthorizationGate {
    /// A gate with no routes.
    pub fn new(unmapped: UnmappedRoutePolicy) -> Self {
        Self {
            rules: Vec::new(),
            unmapped,
        }
    }

    /// A gate preloaded with [`DEFAULT_ROUTES`].
    pub fn with_default_routes(unmapped: UnmappedRoutePolicy) -> Self {
        DEFAULT_ROUTES
            .iter()
            .fold(Self::new(unmapped), |gate, (prefix, permission)| {
                gate.route(*prefix, *permission)
            })
    }

    /// Adds or replaces the permission required under `prefix`.
    #[must_use]
    pub fn route(mut self, prefix: impl Into<String>, permission: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let permission = permission.into();
        match self.rules.iter_mut().find(|rule| rule.prefix == prefix) {
            Some(rule) => rule.permission = permission,
            None => self.rules.push(RouteRule { prefix, permission }),
        }
        self.rules
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.prefix.cmp(&b.prefix)));
        self
    }

    pub fn unmapped_policy(&self) -> UnmappedRoutePolicy {
        self.unmapped
    }

    /// Permission required for `path`, if any prefix matches.
    pub fn required_permission(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| path.starts_with(rule.prefix.as_str()))
            .map(|rule| rule.permission.as_str())
    }

    pub fn authorize(&self, path: &str, ctx: &AuthContext) -> Decision {
        match self.required_permission(path) {
            Some(permission) if ctx.has_permission(permission) => Decision::Allow,
            Some(permission) => Decision::Deny(DenyReason::MissingPermission(permission.to_string())),
            None => match self.unmapped {
                UnmappedRoutePolicy::Allow => Decision::Allow,
                UnmappedRoutePolicy::Deny => Decision::Deny(DenyReason::UnmappedRoute),
            },
        }
    }

    /// [`authorize`](Self::authorize) as a `Result`, denials becoming [`AuthError::Forbidden`].
    pub fn check(&self, path: &str, ctx: &AuthContext) -> Result<(), AuthError> {
        match self.authorize(path, ctx) {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::MissingPermission(permission)) => {
                Err(AuthError::Forbidden(permission))
            }
            Decision::Deny(DenyReason::UnmappedRoute) => Err(AuthError::Forbidden(path.to_string())),
        }
    }
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::with_default_routes(UnmappedRoutePolicy::default())
    }
}
