//! Court routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::court::{
    check_opening_hours, CreateCourtRequest, ListCourtsQuery, UpdateCourtRequest,
};
use domain::models::{Court, Permission};
use persistence::repositories::CourtRepository;
use shared::pagination::Paginated;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::page_request;

fn not_found() -> ApiError {
    ApiError::NotFound("Court not found".into())
}

pub(crate) fn validation_message(err: ValidationError) -> ApiError {
    ApiError::Validation(
        err.message
            .map(|m| m.into_owned())
            .unwrap_or_else(|| err.code.into_owned()),
    )
}

/// Loads a court of the organization or fails with 404.
pub(crate) async fn find_court(
    state: &AppState,
    org_id: Uuid,
    court_id: Uuid,
) -> Result<Court, ApiError> {
    CourtRepository::new(state.pool.clone())
        .find(org_id, court_id)
        .await?
        .ok_or_else(not_found)
}

/// POST /api/v1/organizations/:org_id/courts
pub async fn create_court(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateCourtRequest>,
) -> Result<(StatusCode, Json<Court>), ApiError> {
    user.require_org_permission(org_id, Permission::CourtManage)?;
    request.validate()?;

    let court = CourtRepository::new(state.pool.clone())
        .create(org_id, &request)
        .await?;

    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        court_id = %court.id,
        "Created court"
    );
    Ok((StatusCode::CREATED, Json(court)))
}

/// GET /api/v1/organizations/:org_id/courts
pub async fn list_courts(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListCourtsQuery>,
) -> Result<Json<Paginated<Court>>, ApiError> {
    user.require_org_permission(org_id, Permission::CourtRead)?;

    let page = page_request(&state, query.page, query.per_page);
    let (courts, total) = CourtRepository::new(state.pool.clone())
        .list(org_id, &query, page)
        .await?;
    Ok(Json(Paginated::new(courts, page, total)))
}

/// GET /api/v1/organizations/:org_id/courts/:court_id
pub async fn get_court(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Court>, ApiError> {
    user.require_org_permission(org_id, Permission::CourtRead)?;
    Ok(Json(find_court(&state, org_id, court_id).await?))
}

/// PUT /api/v1/organizations/:org_id/courts/:court_id
pub async fn update_court(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateCourtRequest>,
) -> Result<Json<Court>, ApiError> {
    user.require_org_permission(org_id, Permission::CourtManage)?;
    request.validate()?;

    // Partial updates must still leave opens_at before closes_at.
    if request.opens_at.is_some() || request.closes_at.is_some() {
        let existing = find_court(&state, org_id, court_id).await?;
        let (opens_at, closes_at) = request.effective_hours(&existing);
        check_opening_hours(opens_at, closes_at).map_err(validation_message)?;
    }

    let court = CourtRepository::new(state.pool.clone())
        .update(org_id, court_id, &request)
        .await?
        .ok_or_else(not_found)?;

    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        court_id = %court_id,
        "Updated court"
    );
    Ok(Json(court))
}

/// DELETE /api/v1/organizations/:org_id/courts/:court_id
pub async fn delete_court(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    user.require_org_permission(org_id, Permission::CourtManage)?;

    let deleted = CourtRepository::new(state.pool.clone())
        .delete(org_id, court_id)
        .await?;
    if !deleted {
        return Err(not_found());
    }

    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        court_id = %court_id,
        "Deleted court"
    );
    Ok(StatusCode::NO_CONTENT)
}
