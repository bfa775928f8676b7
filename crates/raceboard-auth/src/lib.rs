//! # Raceboard Auth
//!
//! Session tokens, identity resolution and route authorization.
//!
//! - [`claims`]: [`SessionClaims`], the exact token payload
//! - [`jwt`]: Token signing and verification, pinned to HS256
//! - [`resolver`]: Token claims to [`AuthContext`] through the store
//! - [`gate`]: Route-prefix permission table and allow/deny decision
//!
//! Per request the pipeline is verify, then resolve, then authorize. Any
//! failure ends the request with the matching [`raceboard_core::AuthError`].
//!
//! # Example
//!
//! ```ignore
//! use raceboard_auth::{AuthorizationGate, resolve_identity, verify_token};
//!
//! let claims = verify_token(&token, &jwt_config)?;
//! let ctx = resolve_identity(store.as_ref(), &claims).await?;
//! gate.check("/role/add", &ctx)?;
//! ```

pub mod claims;
pub mod context;
pub mod gate;
pub mod jwt;
pub mod resolver;

pub use claims::SessionClaims;
pub use context::AuthContext;
pub use gate::{AuthorizationGate, DEFAULT_ROUTES, Decision, DenyReason};
pub use jwt::{TOKEN_ALGORITHM, create_session_token, sign_token, verify_token, verify_token_at};
pub use resolver::resolve_identity;
