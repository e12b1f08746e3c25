//! Login, token rotation, logout and profile endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{send, TestContext, TEST_PASSWORD};
use domain::models::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_login_returns_user_and_tokens() {
    let Some(ctx) = TestContext::new().await else { return };
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], user.email.as_str());
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["tokens"]["token_type"], "Bearer");
    assert!(body["tokens"]["expires_in"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let Some(ctx) = TestContext::new().await else { return };
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "Wrong!Password1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": common::unique_email(), "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_rotates_and_detects_replay() {
    let Some(ctx) = TestContext::new().await else { return };
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, rotated) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh_token"], user.refresh_token.as_str());

    // The consumed token is now a replay.
    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let Some(ctx) = TestContext::new().await else { return };
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/logout",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown tokens are accepted silently.
    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/logout",
        None,
        Some(json!({ "refresh_token": "never-issued" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_me_includes_permissions() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(domain::models::OrganizationType::Arena).await;
    let sales = ctx.seed_user(UserRole::Sales, Some(org)).await;

    let (status, body) = send(&ctx.app, Method::GET, "/api/v1/me", Some(&sales.access_token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], sales.id.to_string());
    assert_eq!(body["organization_id"], org.to_string());
    let permissions = body["permissions"].as_array().unwrap();
    assert!(permissions.contains(&json!("booking:manage")));
    assert!(!permissions.contains(&json!("court:manage")));
}

#[tokio::test]
async fn test_update_profile() {
    let Some(ctx) = TestContext::new().await else { return };
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        "/api/v1/me",
        Some(&user.access_token),
        Some(json!({ "display_name": "Renamed Player", "phone": "+421900123456" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Renamed Player");
    assert_eq!(body["phone"], "+421900123456");
}

#[tokio::test]
async fn test_change_password_revokes_sessions() {
    let Some(ctx) = TestContext::new().await else { return };
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        "/api/v1/me/password",
        Some(&user.access_token),
        Some(json!({ "current_password": "Wrong!Password1", "new_password": "Another!Pass9" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        "/api/v1/me/password",
        Some(&user.access_token),
        Some(json!({ "current_password": TEST_PASSWORD, "new_password": "Another!Pass9" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.login(&user.email, "Another!Pass9").await;
}

#[tokio::test]
async fn test_disabled_account_is_locked_out() {
    let Some(ctx) = TestContext::new().await else { return };
    let admin = ctx.seed_user(UserRole::SuperAdmin, None).await;
    let user = ctx.seed_user(UserRole::Customer, None).await;

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        &format!("/api/v1/users/{}/status", user.id),
        Some(&admin.access_token),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (status, _) = send(&ctx.app, Method::GET, "/api/v1/me", Some(&user.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
