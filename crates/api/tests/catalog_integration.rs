//! Events, packages, advertisements, bank details and dashboards.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{send, TestContext};
use domain::models::{OrganizationType, UserRole};
use serde_json::json;

#[tokio::test]
async fn test_unpublished_events_hidden_from_customers() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Education).await;
    let educator = ctx.seed_user(UserRole::EducationStaff, Some(org)).await;
    let customer = ctx.seed_user(UserRole::Customer, None).await;
    let events_url = format!("/api/v1/organizations/{org}/events");

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &events_url,
        Some(&educator.access_token),
        Some(json!({
            "title": "Backwards clinic",
            "starts_at": "2031-04-01T18:00:00Z",
            "ends_at": "2031-04-01T16:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, event) = send(
        &ctx.app,
        Method::POST,
        &events_url,
        Some(&educator.access_token),
        Some(json!({
            "title": "Junior clinic",
            "starts_at": "2031-04-01T16:00:00Z",
            "ends_at": "2031-04-01T18:00:00Z",
            "capacity": 12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["is_published"], false);
    let event_url = format!("{events_url}/{}", event["id"].as_str().unwrap());

    let (status, _) = send(&ctx.app, Method::GET, &event_url, Some(&customer.access_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = send(&ctx.app, Method::GET, &events_url, Some(&customer.access_token), None).await;
    assert_eq!(list["pagination"]["total"], 0);

    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        &event_url,
        Some(&customer.access_token),
        Some(json!({ "is_published": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, published) = send(
        &ctx.app,
        Method::PUT,
        &event_url,
        Some(&educator.access_token),
        Some(json!({ "is_published": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["is_published"], true);

    let (status, _) = send(&ctx.app, Method::GET, &event_url, Some(&customer.access_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&ctx.app, Method::DELETE, &event_url, Some(&educator.access_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_package_booking_pricing_and_capacity() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Hospitality).await;
    let admin = ctx.seed_user(UserRole::ArenaAdmin, Some(org)).await;
    let sales = ctx.seed_user(UserRole::Sales, Some(org)).await;
    let customer = ctx.seed_user(UserRole::Customer, None).await;

    let (status, package) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{org}/packages"),
        Some(&sales.access_token),
        Some(json!({
            "name": "Lakeside weekend",
            "price_cents": 30000,
            "capacity": 4,
            "duration_nights": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let package_url = format!(
        "/api/v1/organizations/{org}/packages/{}",
        package["id"].as_str().unwrap()
    );

    let stay = |guests: i32| {
        json!({ "check_in": "2031-06-05", "check_out": "2031-06-07", "guests": guests })
    };

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &format!("{package_url}/bookings"),
        Some(&customer.access_token),
        Some(stay(5)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, booking) = send(
        &ctx.app,
        Method::POST,
        &format!("{package_url}/bookings"),
        Some(&customer.access_token),
        Some(stay(2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["total_price_cents"], 20000);
    assert_eq!(booking["status"], "pending");
    let booking_url = format!(
        "/api/v1/organizations/{org}/package-bookings/{}",
        booking["id"].as_str().unwrap()
    );

    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        &format!("{booking_url}/status"),
        Some(&customer.access_token),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, confirmed) = send(
        &ctx.app,
        Method::PUT,
        &format!("{booking_url}/status"),
        Some(&sales.access_token),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status_code"], 1);

    let (status, list) = send(
        &ctx.app,
        Method::GET,
        &format!("{package_url}/bookings"),
        Some(&sales.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["pagination"]["total"], 1);

    // Deactivated packages take no bookings and vanish for customers.
    let (status, _) = send(
        &ctx.app,
        Method::PUT,
        &package_url,
        Some(&admin.access_token),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &format!("{package_url}/bookings"),
        Some(&admin.access_token),
        Some(stay(1)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&ctx.app, Method::GET, &package_url, Some(&customer.access_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_live_advertisements_are_public() {
    let Some(ctx) = TestContext::new().await else { return };
    let super_admin = ctx.seed_user(UserRole::SuperAdmin, None).await;
    let customer = ctx.seed_user(UserRole::Customer, None).await;
    let now = Utc::now();

    let ad = |title: &str, starts: chrono::DateTime<Utc>| {
        json!({
            "title": title,
            "placement": "sidebar",
            "link_url": "https://example.com/offer",
            "starts_at": starts,
            "ends_at": now + Duration::days(7)
        })
    };

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/advertisements",
        Some(&customer.access_token),
        Some(ad("Sneaky", now)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, live) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/advertisements",
        Some(&super_admin.access_token),
        Some(ad("Spring sale", now - Duration::hours(1))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, future) = send(
        &ctx.app,
        Method::POST,
        "/api/v1/advertisements",
        Some(&super_admin.access_token),
        Some(ad("Summer sale", now + Duration::days(1))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, public) = send(
        &ctx.app,
        Method::GET,
        "/api/v1/public/advertisements?placement=sidebar",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = public
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&live["id"].as_str().unwrap()));
    assert!(!ids.contains(&future["id"].as_str().unwrap()));

    let (status, _) = send(
        &ctx.app,
        Method::DELETE,
        &format!("/api/v1/advertisements/{}", live["id"].as_str().unwrap()),
        Some(&super_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_bank_details_upsert() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Arena).await;
    let admin = ctx.seed_user(UserRole::ArenaAdmin, Some(org)).await;
    let employee = ctx.seed_user(UserRole::Employee, Some(org)).await;
    let url = format!("/api/v1/organizations/{org}/bank-details");

    let (status, _) = send(&ctx.app, Method::GET, &url, Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&ctx.app, Method::GET, &url, Some(&employee.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let details = |account: &str| {
        json!({
            "account_holder": "Riverside Arena Ltd",
            "bank_name": "First Bank",
            "account_number": account,
            "routing_code": "FBNKGB2L"
        })
    };

    let (status, _) = send(&ctx.app, Method::PUT, &url, Some(&admin.access_token), Some(details("12"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, saved) = send(
        &ctx.app,
        Method::PUT,
        &url,
        Some(&admin.access_token),
        Some(details("1234 5678 90")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["account_number"], "1234567890");
    assert_eq!(saved["updated_by"], admin.id.to_string());

    let (status, replaced) = send(
        &ctx.app,
        Method::PUT,
        &url,
        Some(&admin.access_token),
        Some(details("99887766")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], saved["id"]);

    let (status, fetched) = send(&ctx.app, Method::GET, &url, Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["account_number"], "99887766");
}

#[tokio::test]
async fn test_dashboards() {
    let Some(ctx) = TestContext::new().await else { return };
    let org = ctx.seed_organization(OrganizationType::Arena).await;
    let admin = ctx.seed_user(UserRole::ArenaAdmin, Some(org)).await;
    let customer = ctx.seed_user(UserRole::Customer, None).await;
    let super_admin = ctx.seed_user(UserRole::SuperAdmin, None).await;
    let court = ctx.seed_court(org, &admin).await;

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &format!("/api/v1/organizations/{org}/bookings"),
        Some(&customer.access_token),
        Some(json!({
            "court_id": court,
            "booking_date": "2031-03-10",
            "start_time": "10:00:00",
            "end_time": "11:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let url = format!("/api/v1/organizations/{org}/dashboard");
    let (status, dashboard) = send(&ctx.app, Method::GET, &url, Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["organization_id"], org.to_string());
    assert_eq!(dashboard["courts"], 1);
    assert_eq!(dashboard["bookings"]["pending"], 1);
    assert_eq!(dashboard["revenue_this_month_cents"], 0);

    let (status, _) = send(&ctx.app, Method::GET, &url, Some(&customer.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&ctx.app, Method::GET, "/api/v1/admin/stats", Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(
        &ctx.app,
        Method::GET,
        "/api/v1/admin/stats",
        Some(&super_admin.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats["organizations_total"].as_i64().unwrap() >= 1);
    assert!(stats["users_by_role"]["super_admin"].as_i64().unwrap() >= 1);
}
