//! Authentication service: login, refresh-token rotation, logout and
//! password changes.
//!
//! Refresh tokens are opaque random strings. Only their SHA-256 is stored,
//! in `user_sessions`; every refresh revokes the old session and creates a
//! new one.

use chrono::{Duration, Utc};
use domain::models::User;
use persistence::repositories::UserRepository;
use serde::Serialize;
use shared::crypto::{generate_refresh_token, is_refresh_token_format, sha256_hex};
use shared::jwt::{JwtError, TokenSigner};
use shared::password::{hash_password, validate_password_policy, verify_password, PasswordError};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid email or password".into()),
            AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".into()),
            AuthError::InvalidRefreshToken => {
                ApiError::Unauthorized("Invalid or expired refresh token".into())
            }
            AuthError::WrongPassword => {
                ApiError::Unauthorized("Current password is incorrect".into())
            }
            AuthError::Password(e) => e.into(),
            AuthError::Database(e) => e.into(),
            AuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
        }
    }
}

/// Access and refresh token pair returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct AuthService {
    users: UserRepository,
    signer: Arc<TokenSigner>,
    refresh_token_expiry_secs: i64,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        signer: Arc<TokenSigner>,
        refresh_token_expiry_secs: i64,
    ) -> Self {
        Self {
            users,
            signer,
            refresh_token_expiry_secs,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let entity = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !entity.is_active {
            return Err(AuthError::UserDisabled);
        }

        self.users.update_last_login(entity.id).await?;
        let user: User = entity.into();
        let tokens = self.start_session(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(LoginResult { user, tokens })
    }

    async fn start_session(&self, user: &User) -> Result<TokenPair, AuthError> {
        let refresh_token = generate_refresh_token();
        self.users
            .create_session(
                user.id,
                &sha256_hex(&refresh_token),
                Utc::now() + Duration::seconds(self.refresh_token_expiry_secs),
            )
            .await?;
        self.token_pair(user, refresh_token)
    }

    fn token_pair(&self, user: &User, refresh_token: String) -> Result<TokenPair, AuthError> {
        let access = self
            .signer
            .issue(user.id, user.role.as_str(), user.organization_id)?;
        Ok(TokenPair {
            access_token: access.token,
            refresh_token,
            token_type: "Bearer",
            expires_in: access.expires_in,
        })
    }

    /// Exchange a refresh token for a new pair. The presented token is
    /// revoked; presenting it again fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        if !is_refresh_token_format(refresh_token) {
            return Err(AuthError::InvalidRefreshToken);
        }

        let session = self
            .users
            .find_session_by_hash(&sha256_hex(refresh_token))
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if session.revoked_at.is_some() || session.expires_at <= Utc::now() {
            return Err(AuthError::InvalidRefreshToken);
        }

        let user: User = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?
            .into();
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let new_refresh_token = generate_refresh_token();
        self.users
            .rotate_session(
                session.id,
                user.id,
                &sha256_hex(&new_refresh_token),
                Utc::now() + Duration::seconds(self.refresh_token_expiry_secs),
            )
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        tracing::debug!(user_id = %user.id, "Session rotated");
        self.token_pair(&user, new_refresh_token)
    }

    /// Revoke the session behind a refresh token. Unknown tokens are ignored.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        if !is_refresh_token_format(refresh_token) {
            return Ok(());
        }
        let revoked = self
            .users
            .revoke_session_by_hash(&sha256_hex(refresh_token))
            .await?;
        tracing::debug!(revoked, "Logout");
        Ok(())
    }

    /// Checks the current password and the policy, stores the new hash and
    /// revokes every session of the user.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let entity = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(current_password, &entity.password_hash)? {
            return Err(AuthError::WrongPassword);
        }
        validate_password_policy(new_password)?;

        let hash = hash_password(new_password)?;
        self.users.update_password(user_id, &hash).await?;
        tracing::info!(user_id = %user_id, "Password changed, sessions revoked");
        Ok(())
    }
}
