//! Login, token refresh and logout.

use axum::{extract::State, http::StatusCode, Json};
use persistence::repositories::UserRepository;
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_login;
use crate::services::auth::{AuthError, AuthService, LoginResult, TokenPair};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

pub(crate) fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        UserRepository::new(state.pool.clone()),
        state.token_signer.clone(),
        state.config.jwt.refresh_token_expiry_secs,
    )
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    request.validate()?;

    match auth_service(&state)
        .login(&request.email, &request.password)
        .await
    {
        Ok(result) => {
            record_login("success");
            Ok(Json(result))
        }
        Err(e) => {
            let outcome = match &e {
                AuthError::InvalidCredentials => "invalid_credentials",
                AuthError::UserDisabled => "disabled",
                _ => "error",
            };
            record_login(outcome);
            tracing::info!(outcome, "Login rejected");
            Err(e.into())
        }
    }
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    request.validate()?;
    let tokens = auth_service(&state).refresh(&request.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    auth_service(&state).logout(&request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
