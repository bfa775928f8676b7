//! # Raceboard DB
//!
//! Store interfaces consumed by the authentication pipeline, and their
//! implementations.
//!
//! - [`store`]: One trait per lookup relation, plus the [`AuthStore`] bundle
//! - [`postgres`]: PostgreSQL implementation over a shared `sqlx` pool
//! - [`memory`]: In-memory implementation for tests and local tooling
//!
//! The pipeline only ever holds an `Arc<dyn AuthStore>`, so the backing store
//! is chosen once at startup and injected.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use raceboard_db::{AuthStore, PgStore, init_db_pool};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//! let store: Arc<dyn AuthStore> = Arc::new(PgStore::new(pool));
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{PgStore, init_db_pool};
pub use store::{
    AccountStore, AuthStore, PermissionStore, RolePermissionStore, RoleStore, StoreError,
};

// Re-export PgPool for convenience
pub use sqlx::PgPool;
