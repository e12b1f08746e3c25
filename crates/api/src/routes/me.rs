//! The caller's own profile, password and bookings.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use domain::models::booking::MyBookingsQuery;
use domain::models::user::{ChangePasswordRequest, MeResponse, UpdateProfileRequest};
use domain::models::Booking;
use persistence::repositories::{BookingRepository, UserRepository};
use shared::pagination::Paginated;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::auth::auth_service;
use crate::routes::page_request;

/// GET /api/v1/me
pub async fn get_me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    let entity = UserRepository::new(state.pool.clone())
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(domain::models::User::from(entity).into()))
}

/// PUT /api/v1/me
pub async fn update_me(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<MeResponse>, ApiError> {
    request.validate()?;

    let updated = UserRepository::new(state.pool.clone())
        .update_profile(user.user_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(updated.into()))
}

/// PUT /api/v1/me/password
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    auth_service(&state)
        .change_password(user.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/me/bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MyBookingsQuery>,
) -> Result<Json<Paginated<Booking>>, ApiError> {
    let page = page_request(&state, query.page, query.per_page);
    let (bookings, total) = BookingRepository::new(state.pool.clone())
        .list_for_user(user.user_id, &query, page)
        .await?;
    Ok(Json(Paginated::new(bookings, page, total)))
}
