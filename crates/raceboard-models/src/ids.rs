//! Strongly-typed ID newtypes for domain entities.
//!
//! Roles and permissions are keyed by integers in the database. Wrapping them
//! keeps a `PermissionId` from being passed where a `RoleId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Macro to define a strongly-typed integer ID newtype.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
            ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = i32)]
        pub struct $name(pub i32);

        impl $name {
            #[inline]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Primary key of a role.
    RoleId
);

define_id!(
    /// Primary key of a permission.
    PermissionId
);
