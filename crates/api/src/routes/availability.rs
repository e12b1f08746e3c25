//! Court availability: one-off blocks, recurring unavailability and the
//! computed day schedule.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::availability::{
    AvailabilityRangeQuery, CreateRecurringUnavailabilityRequest, ScheduleQuery,
    SetAvailabilityRequest,
};
use domain::models::{AvailabilityBlock, DaySchedule, Permission, RecurringUnavailability};
use domain::services::CourtCalendar;
use persistence::repositories::{AvailabilityRepository, BookingRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::courts::find_court;

/// PUT /api/v1/organizations/:org_id/courts/:court_id/availability
///
/// Replaces every one-off block of the court. An empty list clears them.
pub async fn set_availability(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<Json<Vec<AvailabilityBlock>>, ApiError> {
    user.require_org_permission(org_id, Permission::CourtManage)?;

    let max_blocks = state.config.limits.max_availability_blocks;
    if request.blocks.len() > max_blocks {
        return Err(ApiError::Validation(format!(
            "At most {} availability blocks are allowed",
            max_blocks
        )));
    }
    request.validate()?;
    find_court(&state, org_id, court_id).await?;

    let blocks = AvailabilityRepository::new(state.pool.clone())
        .replace_blocks(court_id, &request.blocks)
        .await?;

    info!(
        user_id = %user.user_id,
        court_id = %court_id,
        blocks = blocks.len(),
        "Replaced availability blocks"
    );
    Ok(Json(blocks))
}

/// GET /api/v1/organizations/:org_id/courts/:court_id/availability
pub async fn list_availability(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AvailabilityRangeQuery>,
) -> Result<Json<Vec<AvailabilityBlock>>, ApiError> {
    user.require_org_permission(org_id, Permission::CourtRead)?;
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::Validation("from must not be after to".into()));
        }
    }
    find_court(&state, org_id, court_id).await?;

    let blocks = AvailabilityRepository::new(state.pool.clone())
        .list_blocks(court_id, query.from, query.to)
        .await?;
    Ok(Json(blocks))
}

/// POST /api/v1/organizations/:org_id/courts/:court_id/recurring-unavailability
pub async fn create_recurring_rule(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateRecurringUnavailabilityRequest>,
) -> Result<(StatusCode, Json<RecurringUnavailability>), ApiError> {
    user.require_org_permission(org_id, Permission::CourtManage)?;
    request.validate()?;
    find_court(&state, org_id, court_id).await?;

    let rule = AvailabilityRepository::new(state.pool.clone())
        .create_rule(court_id, &request)
        .await?;

    info!(
        user_id = %user.user_id,
        court_id = %court_id,
        rule_id = %rule.id,
        day_of_week = rule.day_of_week,
        "Created recurring unavailability"
    );
    Ok((StatusCode::CREATED, Json(rule)))
}

/// GET /api/v1/organizations/:org_id/courts/:court_id/recurring-unavailability
pub async fn list_recurring_rules(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<RecurringUnavailability>>, ApiError> {
    user.require_org_permission(org_id, Permission::CourtRead)?;
    find_court(&state, org_id, court_id).await?;

    let rules = AvailabilityRepository::new(state.pool.clone())
        .list_rules(court_id)
        .await?;
    Ok(Json(rules))
}

/// DELETE /api/v1/organizations/:org_id/courts/:court_id/recurring-unavailability/:rule_id
pub async fn delete_recurring_rule(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((org_id, court_id, rule_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    user.require_org_permission(org_id, Permission::CourtManage)?;
    find_court(&state, org_id, court_id).await?;

    let deleted = AvailabilityRepository::new(state.pool.clone())
        .delete_rule(court_id, rule_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Recurring rule not found".into()));
    }

    info!(user_id = %user.user_id, court_id = %court_id, rule_id = %rule_id, "Deleted recurring unavailability");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/organizations/:org_id/courts/:court_id/schedule?date=YYYY-MM-DD
///
/// Open to any authenticated user so customers can pick a slot.
pub async fn get_schedule(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((org_id, court_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<DaySchedule>, ApiError> {
    let court = find_court(&state, org_id, court_id).await?;

    let (blocks, rules) = AvailabilityRepository::new(state.pool.clone())
        .for_date(court_id, query.date)
        .await?;
    let bookings = BookingRepository::new(state.pool.clone())
        .active_for_date(court_id, query.date)
        .await?;

    let schedule = CourtCalendar::new(&court, query.date, &blocks, &rules, &bookings).day_schedule();
    Ok(Json(schedule))
}
