use tracing::{info, instrument, warn};

use raceboard_auth::create_session_token;
use raceboard_core::{AuthError, verify_password};
use raceboard_db::AuthStore;

use crate::metrics::{track_login_failure, track_login_success, track_session_issued};
use crate::state::AppState;

use super::model::LoginRequest;

pub struct AuthService;

impl AuthService {
    /// Verifies a login attempt and issues a session token.
    ///
    /// The captcha is checked and retired before the account is even looked
    /// up, so a wrong captcha never reveals whether the account exists.
    #[instrument(skip(state, captcha_id, dto), fields(account = %dto.account, identity = %dto.identity))]
    pub async fn login(
        state: &AppState,
        captcha_id: Option<&str>,
        dto: LoginRequest,
    ) -> Result<String, AuthError> {
        let result = Self::authenticate(state, captcha_id, dto).await;
        match &result {
            Ok(_) => {
                track_login_success();
                track_session_issued();
            }
            Err(err) => track_login_failure(err.kind()),
        }
        result
    }

    async fn authenticate(
        state: &AppState,
        captcha_id: Option<&str>,
        dto: LoginRequest,
    ) -> Result<String, AuthError> {
        let captcha_ok = match captcha_id {
            Some(id) => state.captchas.consume(id, &dto.code).await,
            None => false,
        };
        if !captcha_ok {
            warn!("Login rejected: captcha missing or mismatched");
            return Err(AuthError::InvalidCaptcha);
        }

        let account = find_account(state.store.as_ref(), &dto).await?;

        let LoginRequest { password, .. } = dto;
        let hash = account.password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))?
            .map_err(|e| AuthError::Internal(e.error.to_string()))?;

        if !matches {
            warn!("Login rejected: password mismatch");
            return Err(AuthError::InvalidPassword);
        }

        let token = create_session_token(&account.account, account.identity, &state.jwt_config)?;
        info!("Login succeeded");
        Ok(token)
    }
}

async fn find_account(
    store: &dyn AuthStore,
    dto: &LoginRequest,
) -> Result<raceboard_models::Account, AuthError> {
    match store
        .find_by_account_and_identity(&dto.account, dto.identity)
        .await?
    {
        Some(account) => Ok(account),
        None => {
            warn!("Login rejected: no such account for identity");
            Err(AuthError::AccountNotFound)
        }
    }
}
