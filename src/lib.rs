//! # Raceboard API
//!
//! HTTP backend of a school competition tracker. Students and teachers log in
//! with a captcha-protected form and receive a cookie session; every other
//! route is gated by role-based permissions resolved live from the database.
//!
//! ## Request pipeline
//!
//! ```text
//! logging -> metrics -> admission limit -> CORS
//!     /auth/captcha            issue a challenge
//!     /auth/login              throttle -> captcha -> account -> bcrypt -> cookie
//!     everything else          session guard -> authorization gate -> handler
//! ```
//!
//! The session guard verifies the `uid` cookie (HS256 only), then rebuilds
//! the caller's account, role and permission set from the store on every
//! request, so a role change applies to the very next call. The gate maps
//! the request path to a required `"type:action"` permission by longest
//! prefix.
//!
//! ## Layout
//!
//! ```text
//! src/
//! ├── middleware/       # session guard, gate, admission, login throttle
//! ├── modules/
//! │   ├── auth/        # captcha store, login service and handlers
//! │   └── users/       # /user/info
//! ├── docs.rs          # OpenAPI
//! ├── logging.rs       # tracing subscriber, request logs
//! ├── metrics.rs       # Prometheus
//! ├── router.rs
//! ├── state.rs
//! └── validator.rs     # ValidatedJson extractor
//! ```
//!
//! Token, resolver and gate logic live in `raceboard-auth`; store traits and
//! implementations in `raceboard-db`.
//!
//! ## Modules
//!
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Tracing subscriber and request logging
//! - [`metrics`]: Prometheus metrics
//! - [`middleware`]: Session, authorization and throttling middleware
//! - [`modules`]: Feature modules (auth, users)
//! - [`router`]: Application router and the protected-route extension point
//! - [`state`]: Shared application state
//! - [`validator`]: Request validation

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use raceboard_auth;
pub use raceboard_config;
pub use raceboard_core;
pub use raceboard_db;
pub use raceboard_models;
