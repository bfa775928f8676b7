//! # Raceboard CLI
//!
//! Administrative database operations behind the `raceboard-cli` binary.
//!
//! - [`accounts`]: Create a single account, import accounts from the rosters
//! - [`rbac`]: Seed the default roles and the full permission matrix
//!
//! ```ignore
//! use raceboard_cli::{accounts, rbac};
//!
//! rbac::seed_rbac(&pool).await?;
//! let report = accounts::sync_accounts(&pool).await?;
//! ```

pub mod accounts;
pub mod rbac;
