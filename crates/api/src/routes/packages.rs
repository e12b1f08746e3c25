//! Hospitality packages and their bookings.
//!
//! Any authenticated user may browse active packages and book a stay.
//! Inactive packages and the booking list are for `package:manage` holders.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::package::{
    CreatePackageBookingRequest, CreatePackageRequest, ListPackageBookingsQuery,
    ListPackagesQuery, UpdatePackageBookingStatusRequest, UpdatePackageRequest,
};
use domain::models::{Package, PackageBooking, Permission};
use domain::services::package_stay_price;
use persistence::repositories::{NewPackageBooking, PackageRepository};
use shared::pagination::Paginated;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_booking_created, record_booking_status_change};
use crate::middleware::CurrentUser;
use crate::routes::bookings::{check_status_change, resolve_booker};
use crate::routes::organizations::require_active_organization;
use crate::routes::page_request;

fn package_not_found() -> ApiError {
    ApiError::NotFound("Package not found".into())
}

fn booking_not_found() -> ApiError {
    ApiError::NotFound("Package booking not found".into())
}

fn can_manage(user: &CurrentUser, org_id: Uuid) -> bool {
    user.belongs_to(org_id) && user.has_permission(Permission::PackageManage)
}

/// Capacity and active-state checks for a new stay.
pub(crate) fn check_stay(package: &Package, guests: i32) -> Result<(), ApiError> {
    if !package.is_active {
        return Err(ApiError::Conflict("Package is not available".into()));
    }
    if guests > package.capacity {
        return Err(ApiError::Validation(format!(
            "Package accommodates at most {} guests",
            package.capacity
        )));
    }
    Ok(())
}

/// POST /api/v1/organizations/:org_id/packages
pub async fn create_package(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<Package>), ApiError> {
    user.require_org_permission(org_id, Permission::PackageManage)?;
    request.validate()?;

    let package = PackageRepository::new(state.pool.clone())
        .create(org_id, &request)
        .await?;

    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        package_id = %package.id,
        "Created package"
    );
    Ok((StatusCode::CREATED, Json(package)))
}

/// GET /api/v1/organizations/:org_id/packages
pub async fn list_packages(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Query(mut query): Query<ListPackagesQuery>,
) -> Result<Json<Paginated<Package>>, ApiError> {
    if !can_manage(&user, org_id) {
        query.is_active = Some(true);
    }

    let page = page_request(&state, query.page, query.per_page);
    let (packages, total) = PackageRepository::new(state.pool.clone())
        .list(org_id, &query, page)
        .await?;
    Ok(Json(Paginated::new(packages, page, total)))
}

/// GET /api/v1/organizations/:org_id/packages/:package_id
pub async fn get_package(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, package_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Package>, ApiError> {
    let package = PackageRepository::new(state.pool.clone())
        .find(org_id, package_id)
        .await?
        .ok_or_else(package_not_found)?;

    if !package.is_active && !can_manage(&user, org_id) {
        return Err(package_not_found());
    }
    Ok(Json(package))
}

/// PUT /api/v1/organizations/:org_id/packages/:package_id
pub async fn update_package(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, package_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdatePackageRequest>,
) -> Result<Json<Package>, ApiError> {
    user.require_org_permission(org_id, Permission::PackageManage)?;
    request.validate()?;

    let package = PackageRepository::new(state.pool.clone())
        .update(org_id, package_id, &request)
        .await?
        .ok_or_else(package_not_found)?;

    info!(user_id = %user.user_id, organization_id = %org_id, package_id = %package_id, "Updated package");
    Ok(Json(package))
}

/// DELETE /api/v1/organizations/:org_id/packages/:package_id
pub async fn delete_package(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, package_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    user.require_org_permission(org_id, Permission::PackageManage)?;

    if !PackageRepository::new(state.pool.clone())
        .delete(org_id, package_id)
        .await?
    {
        return Err(package_not_found());
    }

    info!(user_id = %user.user_id, organization_id = %org_id, package_id = %package_id, "Deleted package");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/organizations/:org_id/packages/:package_id/bookings
pub async fn create_package_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, package_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreatePackageBookingRequest>,
) -> Result<(StatusCode, Json<PackageBooking>), ApiError> {
    request.validate()?;
    let booker = resolve_booker(&user, org_id, request.user_id)?;
    require_active_organization(&state, org_id).await?;

    let repo = PackageRepository::new(state.pool.clone());
    let package = repo
        .find(org_id, package_id)
        .await?
        .ok_or_else(package_not_found)?;
    check_stay(&package, request.guests)?;

    let total_price_cents =
        package_stay_price(package.price_cents, package.duration_nights, request.nights());

    let booking = repo
        .create_booking(NewPackageBooking {
            package_id,
            organization_id: org_id,
            user_id: booker,
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            total_price_cents,
            notes: request.notes.as_deref(),
        })
        .await?;

    record_booking_created("package");
    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        package_id = %package_id,
        booking_id = %booking.id,
        nights = request.nights(),
        "Created package booking"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/v1/organizations/:org_id/packages/:package_id/bookings
pub async fn list_package_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, package_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ListPackageBookingsQuery>,
) -> Result<Json<Paginated<PackageBooking>>, ApiError> {
    user.require_org_permission(org_id, Permission::PackageManage)?;

    let repo = PackageRepository::new(state.pool.clone());
    repo.find(org_id, package_id)
        .await?
        .ok_or_else(package_not_found)?;

    let page = page_request(&state, query.page, query.per_page);
    let (bookings, total) = repo.list_bookings(package_id, &query, page).await?;
    Ok(Json(Paginated::new(bookings, page, total)))
}

/// GET /api/v1/organizations/:org_id/package-bookings/:booking_id
pub async fn get_package_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PackageBooking>, ApiError> {
    let booking = PackageRepository::new(state.pool.clone())
        .find_booking(org_id, booking_id)
        .await?
        .ok_or_else(booking_not_found)?;

    if !user.is_self_or_org_permission(booking.user_id, org_id, Permission::PackageManage) {
        return Err(booking_not_found());
    }
    Ok(Json(booking))
}

/// PUT /api/v1/organizations/:org_id/package-bookings/:booking_id/status
pub async fn update_package_booking_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, booking_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdatePackageBookingStatusRequest>,
) -> Result<Json<PackageBooking>, ApiError> {
    let repo = PackageRepository::new(state.pool.clone());
    let existing = repo
        .find_booking(org_id, booking_id)
        .await?
        .ok_or_else(booking_not_found)?;
    if !user.is_self_or_org_permission(existing.user_id, org_id, Permission::PackageManage) {
        return Err(booking_not_found());
    }
    check_status_change(
        &user,
        org_id,
        existing.user_id,
        request.status,
        Permission::PackageManage,
    )?;

    let booking = repo
        .update_booking_status(org_id, booking_id, request.status)
        .await?;

    record_booking_status_change("package", booking.status.as_str());
    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        booking_id = %booking_id,
        from = %existing.status,
        to = %booking.status,
        "Changed package booking status"
    );
    Ok(Json(booking))
}
