//! Bearer token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::jwt::TokenSigner;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Identity taken from a valid access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub jti: String,
}

impl UserAuth {
    pub fn validate(signer: &TokenSigner, token: &str) -> Result<Self, String> {
        let claims = signer
            .validate(token)
            .map_err(|e| format!("Invalid token: {}", e))?;
        let user_id = claims
            .user_id()
            .map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuth {
            user_id,
            jti: claims.jti,
        })
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a valid access token and stores [`UserAuth`]
/// in request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return ApiError::Unauthorized("Missing or invalid Authorization header".into())
            .into_response();
    };

    match UserAuth::validate(&state.token_signer, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            ApiError::Unauthorized("Invalid or expired token".into()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-for-signing-access-tokens";

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_validate_roundtrip() {
        let signer = TokenSigner::new(SECRET, 900, 0).unwrap();
        let user_id = Uuid::new_v4();
        let issued = signer.issue(user_id, "customer", None).unwrap();

        let auth = UserAuth::validate(&signer, &issued.token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.jti, issued.jti);
    }

    #[test]
    fn test_validate_rejects_foreign_signature() {
        let signer = TokenSigner::new(SECRET, 900, 0).unwrap();
        let other = TokenSigner::new("another-secret-key-that-is-long-enough", 900, 0).unwrap();
        let issued = other.issue(Uuid::new_v4(), "customer", None).unwrap();

        assert!(UserAuth::validate(&signer, &issued.token).is_err());
    }
}
