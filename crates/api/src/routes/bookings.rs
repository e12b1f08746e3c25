//! Court booking routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::booking::{CreateBookingRequest, ListBookingsQuery, UpdateBookingStatusRequest};
use domain::models::{Booking, BookingStatus, Permission};
use persistence::repositories::{BookingRepository, BookingWriteError, NewBooking};
use shared::pagination::Paginated;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_booking_conflict, record_booking_created, record_booking_status_change,
};
use crate::middleware::CurrentUser;
use crate::routes::organizations::require_active_organization;
use crate::routes::page_request;

fn not_found() -> ApiError {
    ApiError::NotFound("Booking not found".into())
}

/// Who the booking is for. Booking on behalf of someone else needs
/// `booking:manage` in the organization.
pub(crate) fn resolve_booker(
    user: &CurrentUser,
    org_id: Uuid,
    requested: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    match requested {
        Some(other) if other != user.user_id => {
            user.require_org_permission(org_id, Permission::BookingManage)?;
            Ok(other)
        }
        _ => Ok(user.user_id),
    }
}

/// Staff holding `manage` in the organization may apply any allowed
/// transition. Everyone else may only cancel their own booking.
pub(crate) fn check_status_change(
    user: &CurrentUser,
    org_id: Uuid,
    owner_id: Uuid,
    next: BookingStatus,
    manage: Permission,
) -> Result<(), ApiError> {
    if user.belongs_to(org_id) && user.has_permission(manage) {
        return Ok(());
    }
    if owner_id == user.user_id {
        if next == BookingStatus::Cancelled {
            return Ok(());
        }
        return Err(ApiError::Forbidden(
            "You can only cancel your own bookings".into(),
        ));
    }
    Err(ApiError::Forbidden(format!("Missing permission: {}", manage)))
}

/// POST /api/v1/organizations/:org_id/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    request.validate()?;
    let booker = resolve_booker(&user, org_id, request.user_id)?;
    require_active_organization(&state, org_id).await?;

    let result = BookingRepository::new(state.pool.clone())
        .create(
            NewBooking {
                organization_id: org_id,
                court_id: request.court_id,
                user_id: booker,
                booking_date: request.booking_date,
                start_time: request.start_time,
                end_time: request.end_time,
                notes: request.notes.as_deref(),
                created_by: user.user_id,
            },
            state.config.limits.max_booking_minutes,
        )
        .await;

    let booking = match result {
        Ok(booking) => booking,
        Err(BookingWriteError::Unavailable(reason)) => {
            record_booking_conflict();
            warn!(
                organization_id = %org_id,
                court_id = %request.court_id,
                date = %request.booking_date,
                reason = %reason,
                "Booking rejected"
            );
            return Err(reason.into());
        }
        Err(e) => return Err(e.into()),
    };

    record_booking_created("court");
    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        booking_id = %booking.id,
        court_id = %booking.court_id,
        "Created booking"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/v1/organizations/:org_id/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Paginated<Booking>>, ApiError> {
    user.require_org_permission(org_id, Permission::BookingRead)?;
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::Validation("from must not be after to".into()));
        }
    }

    let page = page_request(&state, query.page, query.per_page);
    let (bookings, total) = BookingRepository::new(state.pool.clone())
        .list(org_id, &query, page)
        .await?;
    Ok(Json(Paginated::new(bookings, page, total)))
}

/// GET /api/v1/organizations/:org_id/bookings/:booking_id
pub async fn get_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Booking>, ApiError> {
    let booking = BookingRepository::new(state.pool.clone())
        .find(org_id, booking_id)
        .await?
        .ok_or_else(not_found)?;

    if !user.is_self_or_org_permission(booking.user_id, org_id, Permission::BookingRead) {
        return Err(not_found());
    }
    Ok(Json(booking))
}

/// PUT /api/v1/organizations/:org_id/bookings/:booking_id/status
pub async fn update_booking_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, booking_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let existing = repo.find(org_id, booking_id).await?.ok_or_else(not_found)?;
    if !user.is_self_or_org_permission(existing.user_id, org_id, Permission::BookingRead) {
        return Err(not_found());
    }
    check_status_change(
        &user,
        org_id,
        existing.user_id,
        request.status,
        Permission::BookingManage,
    )?;

    let booking = repo.update_status(org_id, booking_id, request.status).await?;

    record_booking_status_change("court", booking.status.as_str());
    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        booking_id = %booking_id,
        from = %existing.status,
        to = %booking.status,
        "Changed booking status"
    );
    Ok(Json(booking))
}
