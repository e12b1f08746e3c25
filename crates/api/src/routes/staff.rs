//! Organization staff routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::staff::{CreateStaffRequest, ListStaffQuery, UpdateStaffRequest};
use domain::models::{Permission, StaffMember};
use persistence::repositories::{NewStaffMember, StaffRepository};
use shared::pagination::Paginated;
use shared::password::{hash_password, validate_password_policy};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::page_request;

fn not_found() -> ApiError {
    ApiError::NotFound("Staff member not found".into())
}

/// POST /api/v1/organizations/:org_id/staff
///
/// Creates the account and the staff link together. Arena admins can only
/// be created by a super-admin.
pub async fn create_staff(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffMember>), ApiError> {
    current.require_org_permission(org_id, Permission::StaffManage)?;
    request.validate()?;

    if !request.role.is_staff() {
        return Err(ApiError::Validation(format!(
            "Role {} is not a staff role",
            request.role
        )));
    }
    if !current.role.can_assign_staff_role(request.role) {
        return Err(ApiError::Forbidden(format!(
            "You cannot create {} accounts",
            request.role
        )));
    }
    validate_password_policy(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let member = StaffRepository::new(state.pool.clone())
        .create(NewStaffMember {
            organization_id: org_id,
            email: &request.email,
            password_hash: &password_hash,
            display_name: &request.display_name,
            phone: request.phone.as_deref(),
            role: request.role,
            position: request.position.as_deref(),
            specialization: request.specialization.as_deref(),
        })
        .await?;

    info!(
        user_id = %current.user_id,
        organization_id = %org_id,
        staff_user_id = %member.user_id,
        role = %member.role,
        "Created staff member"
    );
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/v1/organizations/:org_id/staff
pub async fn list_staff(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListStaffQuery>,
) -> Result<Json<Paginated<StaffMember>>, ApiError> {
    current.require_org_permission(org_id, Permission::StaffManage)?;

    let page = page_request(&state, query.page, query.per_page);
    let (members, total) = StaffRepository::new(state.pool.clone())
        .list(org_id, &query, page)
        .await?;
    Ok(Json(Paginated::new(members, page, total)))
}

/// GET /api/v1/organizations/:org_id/staff/:user_id
pub async fn get_staff(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StaffMember>, ApiError> {
    if !current.is_self_or_org_permission(user_id, org_id, Permission::StaffManage) {
        return Err(ApiError::Forbidden(format!(
            "Missing permission: {}",
            Permission::StaffManage
        )));
    }

    let member = StaffRepository::new(state.pool.clone())
        .find(org_id, user_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(member))
}

/// PUT /api/v1/organizations/:org_id/staff/:user_id
pub async fn update_staff(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<StaffMember>, ApiError> {
    current.require_org_permission(org_id, Permission::StaffManage)?;
    request.validate()?;

    let member = StaffRepository::new(state.pool.clone())
        .update(org_id, user_id, &request)
        .await?
        .ok_or_else(not_found)?;

    info!(
        user_id = %current.user_id,
        organization_id = %org_id,
        staff_user_id = %user_id,
        "Updated staff member"
    );
    Ok(Json(member))
}

/// DELETE /api/v1/organizations/:org_id/staff/:user_id
///
/// Unlinks the member and disables the account.
pub async fn remove_staff(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    current.require_org_permission(org_id, Permission::StaffManage)?;
    if user_id == current.user_id {
        return Err(ApiError::Validation("You cannot remove yourself".into()));
    }

    let repo = StaffRepository::new(state.pool.clone());
    let member = repo.find(org_id, user_id).await?.ok_or_else(not_found)?;
    if !current.role.can_assign_staff_role(member.role) {
        return Err(ApiError::Forbidden(format!(
            "You cannot remove {} accounts",
            member.role
        )));
    }

    if !repo.remove(org_id, user_id).await? {
        return Err(not_found());
    }

    info!(
        user_id = %current.user_id,
        organization_id = %org_id,
        staff_user_id = %user_id,
        "Removed staff member"
    );
    Ok(StatusCode::NO_CONTENT)
}
