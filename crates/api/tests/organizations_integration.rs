//! Organizations, platform user administration and organization staff.

mod common;

use axum::http::{Method, StatusCode};
use common::{send, unique_email, TestContext, TEST_PASSWORD};
use domain::models::{OrganizationType, UserRole};
use serde_json::json;

#[tokio::test]
async fn test_super_admin_manages_organizations() {
    let Some(ctx) = TestContext::new().await else { return };
    let admin = ctx.seed_user(UserRole::SuperAdmin, None).await;

    let (status, org) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/organizations",
        Some(&admin.access_token),
        Some(json!({
            "name": "Riverside Arena",
            "organization_type": "arena",
            "contact_email": "desk@riverside.example"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(org["is_active"], true);
    let org_id = org["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &ctx.app,
        Method::PUT,
        &format!("/api/v1/organizations/{org_id}/status"),
        Some(&admin.access_token),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_active"], false);

    let (status, list) = send(
        &ctx.app,
        Method::GET,
        "/api/v1/organizations?is_active=false&search=Riverside",
        Some(&admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"] == org_id.as_str()));
    assert!(list["pagination"]["total"].as_i64().unwrap() >= 1);

    let (status, _) = send(
        &ctx.app,
        Method::DELETE,
        &format!("/api/v1/organizations/{org_id}"),
        Some(&admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &ctx.app,
        Method::GET,
        &format!("/api/v1/organizations/{org_id}"),
        Some(&admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_members_see_only_their_organization() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Arena).await;
    let other = ctx.seed_organization(OrganizationType::Education).await;
    let arena_admin = ctx.seed_user(UserRole::ArenaAdmin, Some(org)).await;

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/organizations",
        Some(&arena_admin.access_token),
        Some(json!({ "name": "Rogue", "organization_type": "arena" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx.app,
        Method::GET,
        &format!("/api/v1/organizations/{org}"),
        Some(&arena_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &ctx.app,
        Method::GET,
        &format!("/api/v1/organizations/{other}"),
        Some(&arena_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        &format!("/api/v1/organizations/{org}"),
        Some(&arena_admin.access_token),
        Some(json!({ "address": "12 Court Lane" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "12 Court Lane");
}

#[tokio::test]
async fn test_create_user_checks_role_organization_pairing() {
    let Some(ctx) = TestContext::new().await else { return };
    let admin = ctx.seed_user(UserRole::SuperAdmin, None).await;
    let org = ctx.seed_organization(OrganizationType::Arena).await;

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&admin.access_token),
        Some(json!({
            "email": unique_email(),
            "password": TEST_PASSWORD,
            "display_name": "Floating Employee",
            "role": "employee"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let email = unique_email();
    let (status, user) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&admin.access_token),
        Some(json!({
            "email": email,
            "password": TEST_PASSWORD,
            "display_name": "Desk Employee",
            "role": "employee",
            "organization_id": org
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["organization_id"], org.to_string());

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&admin.access_token),
        Some(json!({
            "email": email,
            "password": TEST_PASSWORD,
            "display_name": "Duplicate",
            "role": "customer"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.login(&email, TEST_PASSWORD).await;
}

#[tokio::test]
async fn test_super_admin_cannot_disable_self() {
    let Some(ctx) = TestContext::new().await else { return };
    let admin = ctx.seed_user(UserRole::SuperAdmin, None).await;

    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        &format!("/api/v1/users/{}/status", admin.id),
        Some(&admin.access_token),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_admin_is_super_admin_only() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Arena).await;
    let arena_admin = ctx.seed_user(UserRole::ArenaAdmin, Some(org)).await;

    let (status, _) = send(
        &ctx.app,
        Method::GET,
        "/api/v1/users",
        Some(&arena_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_arena_admin_manages_staff() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Arena).await;
    let arena_admin = ctx.seed_user(UserRole::ArenaAdmin, Some(org)).await;
    let staff_url = format!("/api/v1/organizations/{org}/staff");

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &staff_url,
        Some(&arena_admin.access_token),
        Some(json!({
            "email": unique_email(),
            "password": TEST_PASSWORD,
            "display_name": "Second Admin",
            "role": "arena_admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let coach_email = unique_email();
    let (status, coach) = send(
        &ctx.app,
        Method::POST,
        &staff_url,
        Some(&arena_admin.access_token),
        Some(json!({
            "email": coach_email,
            "password": TEST_PASSWORD,
            "display_name": "Head Coach",
            "role": "coach",
            "specialization": "tennis"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(coach["role"], "coach");
    assert_eq!(coach["specialization"], "tennis");
    let coach_id = coach["user_id"].as_str().unwrap().to_string();

    let (status, list) = send(
        &ctx.app,
        Method::GET,
        &format!("{staff_url}?role=coach"),
        Some(&arena_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["pagination"]["total"], 1);

    let (status, updated) = send(
        &ctx.app,
        Method::PUT,
        &format!("{staff_url}/{coach_id}"),
        Some(&arena_admin.access_token),
        Some(json!({ "position": "Academy lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["position"], "Academy lead");

    let (status, _) = send(
        &ctx.app,
        Method::DELETE,
        &format!("{staff_url}/{}", arena_admin.id),
        Some(&arena_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &ctx.app,
        Method::DELETE,
        &format!("{staff_url}/{coach_id}"),
        Some(&arena_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Removed staff can no longer sign in.
    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": coach_email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_from_other_organization_forbidden() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Arena).await;
    let other = ctx.seed_organization(OrganizationType::Arena).await;
    let outsider = ctx.seed_user(UserRole::ArenaAdmin, Some(other)).await;

    let (status, _) = send(
        &ctx.app,
        Method::GET,
        &format!("/api/v1/organizations/{org}/staff"),
        Some(&outsider.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

async fn count_owned(ctx: &TestContext, table: &str, org: uuid::Uuid) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE organization_id = $1"))
        .bind(org)
        .fetch_one(&ctx.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_delete_organization_removes_owned_rows_only() {
    let Some(ctx) = TestContext::new().await else { return };
    let super_admin = ctx.seed_user(UserRole::SuperAdmin, None).await;
    let doomed = ctx.seed_organization(OrganizationType::Arena).await;
    let survivor = ctx.seed_organization(OrganizationType::Arena).await;
    let doomed_admin = ctx.seed_user(UserRole::ArenaAdmin, Some(doomed)).await;
    let survivor_admin = ctx.seed_user(UserRole::ArenaAdmin, Some(survivor)).await;
    let doomed_court = ctx.seed_court(doomed, &doomed_admin).await;
    let survivor_court = ctx.seed_court(survivor, &survivor_admin).await;

    let (status, employee) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{doomed}/staff"),
        Some(&doomed_admin.access_token),
        Some(json!({
            "email": unique_email(),
            "password": TEST_PASSWORD,
            "display_name": "Front Desk",
            "role": "employee"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let employee_email = employee["email"].as_str().unwrap().to_string();
    let employee_tokens = ctx.login(&employee_email, TEST_PASSWORD).await;
    let employee_token = employee_tokens["access_token"].as_str().unwrap();

    let slot = |court: uuid::Uuid| {
        json!({
            "court_id": court,
            "booking_date": "2031-03-10",
            "start_time": "10:00:00",
            "end_time": "11:00:00"
        })
    };
    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{doomed}/bookings"),
        Some(employee_token),
        Some(slot(doomed_court)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The same employee plays at another organization.
    let (status, away_booking) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{survivor}/bookings"),
        Some(employee_token),
        Some(slot(survivor_court)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let away_url = format!(
        "/api/v1/organizations/{survivor}/bookings/{}",
        away_booking["id"].as_str().unwrap()
    );

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{doomed}/events"),
        Some(&doomed_admin.access_token),
        Some(json!({
            "title": "Closing tournament",
            "starts_at": "2031-04-01T16:00:00Z",
            "ends_at": "2031-04-01T18:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{doomed}/packages"),
        Some(&doomed_admin.access_token),
        Some(json!({
            "name": "Training camp",
            "price_cents": 30000,
            "capacity": 4,
            "duration_nights": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        &format!("/api/v1/organizations/{doomed}/bank-details"),
        Some(&doomed_admin.access_token),
        Some(json!({
            "account_holder": "Doomed Arena Ltd",
            "bank_name": "First Bank",
            "account_number": "12345678",
            "routing_code": "FBNKGB2L"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &ctx.app,
        Method::DELETE,
        &format!("/api/v1/organizations/{doomed}"),
        Some(&super_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for table in ["courts", "staff_members", "bookings", "events", "packages", "bank_details"] {
        assert_eq!(count_owned(&ctx, table, doomed).await, 0, "{table} left behind");
    }
    assert_eq!(count_owned(&ctx, "courts", survivor).await, 1);
    assert_eq!(count_owned(&ctx, "bookings", survivor).await, 1);

    // The other organization still sees the booking made by the former employee.
    let (status, booking) = send(&ctx.app, Method::GET, &away_url, Some(&survivor_admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["user_id"], employee["user_id"]);

    // Former members keep their account but are detached and locked out.
    let (organization_id, is_active): (Option<uuid::Uuid>, bool) =
        sqlx::query_as("SELECT organization_id, is_active FROM users WHERE id = $1")
            .bind(doomed_admin.id)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(organization_id, None);
    assert!(!is_active);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": doomed_admin.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": employee_email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
