//! Identity class of an account.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Which roster an account belongs to.
///
/// Serialized in lowercase (`"student"`, `"teacher"`) in JSON, in token claims
/// and in the `accounts.identity` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Identity {
    Student,
    Teacher,
}

impl Identity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Identity::Student => "student",
            Identity::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown identity class `{0}`")]
pub struct UnknownIdentity(pub String);

impl FromStr for Identity {
    type Err = UnknownIdentity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Identity::Student),
            "teacher" => Ok(Identity::Teacher),
            other => Err(UnknownIdentity(other.to_string())),
        }
    }
}

impl TryFrom<String> for Identity {
    type Error = UnknownIdentity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
