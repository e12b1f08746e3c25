//! JWT access tokens signed with HS256.
//!
//! Access tokens are short-lived and carry the caller's role and tenant for
//! logging; authorization decisions re-read the user row, so a stale role in
//! a token never grants access. Refresh tokens are opaque (see `crypto`).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Signing secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
}

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role code at issue time
    pub role: String,
    /// Organization the user belonged to at issue time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    pub exp: i64,
    pub iat: i64,
    /// Unique token id, logged for correlation
    pub jti: String,
    pub token_type: String,
}

impl AccessClaims {
    /// Parses the subject claim as a user id.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }
}

/// Issued access token with its id and lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
}

/// Signs and validates access tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_secs: i64,
    leeway_secs: u64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &str, access_token_expiry_secs: i64, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::WeakSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs,
            leeway_secs,
        })
    }

    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }

    /// Issues an access token for the given user.
    pub fn issue(
        &self,
        user_id: Uuid,
        role: &str,
        organization_id: Option<Uuid>,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            org: organization_id.map(|id| id.to_string()),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_in: self.access_token_expiry_secs,
        })
    }

    /// Validates an access token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let claims = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })?;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    fn signer() -> TokenSigner {
        TokenSigner::new(SECRET, 900, 0).unwrap()
    }

    #[test]
    fn test_rejects_short_secret() {
        assert!(matches!(
            TokenSigner::new("short", 900, 0),
            Err(JwtError::WeakSecret)
        ));
    }

    #[test]
    fn test_issue_and_validate() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let issued = signer().issue(user_id, "arena_admin", Some(org_id)).unwrap();

        assert_eq!(issued.expires_in, 900);
        let claims = signer().validate(&issued.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, "arena_admin");
        assert_eq!(claims.org, Some(org_id.to_string()));
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_claims_without_org() {
        let issued = signer().issue(Uuid::new_v4(), "customer", None).unwrap();
        let claims = signer().validate(&issued.token).unwrap();
        assert!(claims.org.is_none());
    }

    #[test]
    fn test_rejects_token_from_other_secret() {
        let other = TokenSigner::new("another_secret_key_that_is_long_enough!!", 900, 0).unwrap();
        let issued = other.issue(Uuid::new_v4(), "customer", None).unwrap();
        assert!(matches!(
            signer().validate(&issued.token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let expired = TokenSigner::new(SECRET, -120, 0).unwrap();
        let issued = expired.issue(Uuid::new_v4(), "customer", None).unwrap();
        assert!(matches!(
            signer().validate(&issued.token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(signer().validate("not.a.jwt").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(SECRET));
    }
}
