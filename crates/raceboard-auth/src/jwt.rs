//! Session token signing and verification.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 and a server-held
//! secret. The algorithm is pinned: a token whose header names anything other
//! than `HS256` (including `none`) is refused before its signature is looked at.
//!
//! Verification checks, in order:
//!
//! 1. three dot-separated segments
//! 2. header algorithm is `HS256`
//! 3. `exp` is not in the past (reported as expired whatever the signature)
//! 4. signature and claim shape, via `jsonwebtoken`
//!
//! Every failure has its own [`AuthError`] variant; they share one HTTP response.
//!
//! # Example
//!
//! ```ignore
//! use raceboard_auth::{create_session_token, verify_token};
//! use raceboard_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_session_token("s2021001", Identity::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use data_encoding::BASE64URL_NOPAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;

use raceboard_config::JwtConfig;
use raceboard_core::{AuthError, Identity};

use crate::claims::SessionClaims;

/// The only algorithm tokens are signed or accepted with.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

#[derive(Deserialize)]
struct RawExpiry {
    exp: u64,
}

fn now_seconds() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Signs arbitrary session claims.
pub fn sign_token(claims: &SessionClaims, jwt_config: &JwtConfig) -> Result<String, AuthError> {
    encode(
        &Header::new(TOKEN_ALGORITHM),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Failed to create token: {}", e)))
}

/// Issues a token for a freshly authenticated account, valid for the
/// configured session window.
pub fn create_session_token(
    account: &str,
    identity: Identity,
    jwt_config: &JwtConfig,
) -> Result<String, AuthError> {
    let lifetime = u64::try_from(jwt_config.session_expiry).unwrap_or(0);
    let claims = SessionClaims::new(account, identity, now_seconds() + lifetime);
    sign_token(&claims, jwt_config)
}

/// Verifies a token against the current time.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<SessionClaims, AuthError> {
    verify_token_at(token, jwt_config, now_seconds())
}

/// Verifies a token as of `now` (Unix seconds).
pub fn verify_token_at(
    token: &str,
    jwt_config: &JwtConfig,
    now: u64,
) -> Result<SessionClaims, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, _signature] = segments.as_slice() else {
        return Err(AuthError::TokenMalformed);
    };

    let header: RawHeader = decode_segment(header)?;
    if header.alg != "HS256" {
        return Err(AuthError::TokenAlgorithmMismatch(header.alg));
    }

    let expiry: RawExpiry = decode_segment(payload)?;
    if expiry.exp < now {
        return Err(AuthError::TokenExpired);
    }

    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = 0;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAlgorithm => {
            AuthError::TokenAlgorithmMismatch(format!("{:?}", TOKEN_ALGORITHM))
        }
        _ => AuthError::TokenMalformed,
    })
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, AuthError> {
    let bytes = BASE64URL_NOPAD
        .decode(segment.as_bytes())
        .map_err(|_| AuthError::TokenMalformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenMalformed)
}
