//! Per-caller rate limiting.
//!
//! Authenticated callers are keyed by user ID. Anonymous callers fall back
//! to the client address from `X-Forwarded-For` / `X-Real-IP`.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::Clock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// Keyed limiter shared by all requests.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<String>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when the limit is zero, which disables rate limiting.
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            rate_limit_per_minute,
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// `Err(retry_after_secs)` when the caller is over its quota.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.limiter.check_key(&key.to_string()).map_err(|not_until| {
            let wait = not_until.wait_time_from(governor::clock::DefaultClock::default().now());
            wait.as_secs().max(1)
        })
    }

    /// Drop limiter state for keys that are back at full quota.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_keys", &self.limiter.len())
            .finish()
    }
}

/// First address in `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn rate_limit_key(req: &Request<Body>) -> String {
    if let Some(auth) = req.extensions().get::<UserAuth>() {
        return format!("user:{}", auth.user_id);
    }
    match client_ip(req.headers()) {
        Some(ip) => format!("ip:{ip}"),
        None => "anonymous".to_string(),
    }
}

/// Runs after authentication when mounted on protected routes so the user
/// ID is available.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let key = rate_limit_key(&req);
    match limiter.check(&key) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(key = %key, retry_after, "Rate limit exceeded");
            rate_limited_response(retry_after)
        }
    }
}

fn rate_limited_response(retry_after: u64) -> Response {
    let mut response = ApiError::RateLimited.into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    #[test]
    fn test_zero_limit_disables() {
        assert!(RateLimiterState::new(0).is_none());
        assert_eq!(
            RateLimiterState::new(100).unwrap().rate_limit_per_minute(),
            100
        );
    }

    #[test]
    fn test_exhaustion() {
        let state = RateLimiterState::new(1).unwrap();
        assert!(state.check("user:1").is_ok());
        let retry_after = state.check("user:1").unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let state = RateLimiterState::new(1).unwrap();
        assert!(state.check("user:1").is_ok());
        assert!(state.check("ip:10.0.0.1").is_ok());
        assert!(state.check("user:1").is_err());
        assert!(state.check("ip:10.0.0.1").is_err());
        assert!(state.check("user:2").is_ok());
    }

    #[test]
    fn test_quota_allows_burst_up_to_limit() {
        let state = RateLimiterState::new(5).unwrap();
        for i in 0..5 {
            assert!(state.check("k").is_ok(), "request {i} should pass");
        }
        assert!(state.check("k").is_err());
    }

    #[test]
    fn test_client_ip_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);

        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.9"));
        assert_eq!(client_ip(&headers).as_deref(), Some("192.168.1.9"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_key_prefers_authenticated_user() {
        let user_id = Uuid::new_v4();
        let mut req = Request::builder()
            .header("x-real-ip", "192.168.1.9")
            .body(Body::empty())
            .unwrap();
        assert_eq!(rate_limit_key(&req), "ip:192.168.1.9");

        req.extensions_mut().insert(UserAuth {
            user_id,
            jti: "jti".into(),
        });
        assert_eq!(rate_limit_key(&req), format!("user:{user_id}"));
    }

    #[test]
    fn test_rate_limited_response() {
        let response = rate_limited_response(42);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn test_debug_output() {
        let state = RateLimiterState::new(100).unwrap();
        state.check("a").unwrap();
        let debug = format!("{state:?}");
        assert!(debug.contains("rate_limit_per_minute"));
        assert!(debug.contains("tracked_keys"));
    }
}
