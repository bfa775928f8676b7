//! Session token claims.

use raceboard_core::Identity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload of a session token.
///
/// The token carries no roles or permissions: those are re-read from the
/// store on every request, so a role change is visible on the next call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    /// Account identifier (subject)
    pub account: String,
    /// Identity class the account logged in as
    pub identity: Identity,
    /// Expiration timestamp (Unix seconds)
    pub exp: u64,
}

impl SessionClaims {
    pub fn new(account: impl Into<String>, identity: Identity, exp: u64) -> Self {
        Self {
            account: account.into(),
            identity,
            exp,
        }
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        self.exp < now
    }
}
