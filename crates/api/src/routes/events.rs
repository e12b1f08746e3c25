//! Organization event routes.
//!
//! Unpublished events are only visible to holders of `event:manage` in the
//! organization.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::event::{
    check_event_window, CreateEventRequest, ListEventsQuery, UpdateEventRequest,
};
use domain::models::{Event, Permission};
use persistence::repositories::EventRepository;
use shared::pagination::Paginated;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::courts::validation_message;
use crate::routes::page_request;

fn not_found() -> ApiError {
    ApiError::NotFound("Event not found".into())
}

fn can_manage(user: &CurrentUser, org_id: Uuid) -> bool {
    user.belongs_to(org_id) && user.has_permission(Permission::EventManage)
}

/// POST /api/v1/organizations/:org_id/events
pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    user.require_org_permission(org_id, Permission::EventManage)?;
    request.validate()?;

    let event = EventRepository::new(state.pool.clone())
        .create(org_id, user.user_id, &request)
        .await?;

    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        event_id = %event.id,
        "Created event"
    );
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/organizations/:org_id/events
pub async fn list_events(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Query(mut query): Query<ListEventsQuery>,
) -> Result<Json<Paginated<Event>>, ApiError> {
    if !can_manage(&user, org_id) {
        query.is_published = Some(true);
    }

    let page = page_request(&state, query.page, query.per_page);
    let (events, total) = EventRepository::new(state.pool.clone())
        .list(org_id, &query, page)
        .await?;
    Ok(Json(Paginated::new(events, page, total)))
}

/// GET /api/v1/organizations/:org_id/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool.clone())
        .find(org_id, event_id)
        .await?
        .ok_or_else(not_found)?;

    if !event.is_published && !can_manage(&user, org_id) {
        return Err(not_found());
    }
    Ok(Json(event))
}

/// PUT /api/v1/organizations/:org_id/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, event_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    user.require_org_permission(org_id, Permission::EventManage)?;
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    if request.starts_at.is_some() || request.ends_at.is_some() {
        let existing = repo.find(org_id, event_id).await?.ok_or_else(not_found)?;
        let (starts_at, ends_at) = request.effective_window(&existing);
        check_event_window(starts_at, ends_at).map_err(validation_message)?;
    }

    let event = repo
        .update(org_id, event_id, &request)
        .await?
        .ok_or_else(not_found)?;

    info!(user_id = %user.user_id, organization_id = %org_id, event_id = %event_id, "Updated event");
    Ok(Json(event))
}

/// DELETE /api/v1/organizations/:org_id/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    user.require_org_permission(org_id, Permission::EventManage)?;

    if !EventRepository::new(state.pool.clone())
        .delete(org_id, event_id)
        .await?
    {
        return Err(not_found());
    }

    info!(user_id = %user.user_id, organization_id = %org_id, event_id = %event_id, "Deleted event");
    Ok(StatusCode::NO_CONTENT)
}
