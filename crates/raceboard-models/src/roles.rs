//! Role and permission domain models.
//!
//! A role owns any number of permissions through the `role_permissions`
//! join table. A permission is identified for authorization purposes by its
//! `"<resource>:<action>"` name, see [`Permission::name`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::ids::{PermissionId, RoleId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Defines a lowercase string-backed enum stored as TEXT.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

string_enum!(
    /// Operation a permission allows.
    PermissionAction("permission action") {
        Add => "add",
        Delete => "delete",
        Update => "update",
        Query => "query",
        Import => "import",
        Export => "export",
    }
);

string_enum!(
    /// Kind of resource a permission applies to.
    ResourceType("resource type") {
        User => "user",
        Role => "role",
        Race => "race",
        Record => "record",
        Permission => "permission",
    }
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: RoleId,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Permission {
    pub id: PermissionId,
    pub label: String,
    #[sqlx(try_from = "String")]
    pub action: PermissionAction,
    #[serde(rename = "type")]
    #[sqlx(rename = "resource_type", try_from = "String")]
    pub resource: ResourceType,
}

impl Permission {
    /// The `"<resource>:<action>"` name used for authorization.
    pub fn name(&self) -> String {
        permission_name(self.resource, self.action)
    }
}

pub fn permission_name(resource: ResourceType, action: PermissionAction) -> String {
    format!("{}:{}", resource.as_str(), action.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RolePermission {
    pub role_id: RoleId,
    pub permission_id: PermissionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_name() {
        let permission = Permission {
            id: PermissionId::new(1),
            label: "create roles".to_string(),
            action: PermissionAction::Add,
            resource: ResourceType::Role,
        };
        assert_eq!(permission.name(), "role:add");
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("query".parse::<PermissionAction>().unwrap(), PermissionAction::Query);
        let err = "grant".parse::<PermissionAction>().unwrap_err();
        assert_eq!(err.kind, "permission action");
    }

    #[test]
    fn test_all_variants_round_trip_through_text() {
        for resource in ResourceType::ALL {
            assert_eq!(resource.as_str().parse::<ResourceType>().unwrap(), *resource);
        }
        assert_eq!(PermissionAction::ALL.len(), 6);
    }

    #[test]
    fn test_permission_serializes_resource_as_type() {
        let permission = Permission {
            id: PermissionId::new(2),
            label: "list races".to_string(),
            action: PermissionAction::Query,
            resource: ResourceType::Race,
        };
        let json = serde_json::to_value(&permission).unwrap();
        assert_eq!(json["type"], "race");
        assert_eq!(json["action"], "query");
    }
}
