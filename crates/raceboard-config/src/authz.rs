//! Authorization gate policy.
//!
//! Routes listed in the permission table require their permission. What
//! happens to an authenticated request whose path matches no entry is decided
//! by [`UnmappedRoutePolicy`], read from `AUTHZ_UNMAPPED_ROUTES`.

use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnmappedRoutePolicy {
    /// Any authenticated caller may use a route without a table entry.
    #[default]
    Allow,
    /// Routes without a table entry are refused.
    Deny,
}

impl FromStr for UnmappedRoutePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" | "open" => Ok(Self::Allow),
            "deny" | "closed" => Ok(Self::Deny),
            other => Err(format!("unknown unmapped route policy `{other}`")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthzConfig {
    pub unmapped_routes: UnmappedRoutePolicy,
}

impl AuthzConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            unmapped_routes: crate::env_or("AUTHZ_UNMAPPED_ROUTES", UnmappedRoutePolicy::Allow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("allow".parse(), Ok(UnmappedRoutePolicy::Allow));
        assert_eq!("DENY".parse(), Ok(UnmappedRoutePolicy::Deny));
        assert!("maybe".parse::<UnmappedRoutePolicy>().is_err());
    }

    #[test]
    fn test_default_is_allow() {
        assert_eq!(AuthzConfig::default().unmapped_routes, UnmappedRoutePolicy::Allow);
    }
}
