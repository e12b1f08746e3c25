//! Organization routes.
//!
//! Creation, listing, status changes and deletion are reserved for
//! super-admins. Members may read their own organization and holders of
//! `organization:manage` may edit its profile.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::organization::{
    CreateOrganizationRequest, ListOrganizationsQuery, UpdateOrganizationRequest,
    UpdateOrganizationStatusRequest,
};
use domain::models::{Organization, Permission};
use persistence::repositories::OrganizationRepository;
use shared::pagination::Paginated;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::page_request;

fn not_found() -> ApiError {
    ApiError::NotFound("Organization not found".into())
}

/// POST /api/v1/organizations
pub async fn create_organization(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    user.require_super_admin()?;
    request.validate()?;

    let organization = OrganizationRepository::new(state.pool.clone())
        .create(&request)
        .await?;

    info!(
        user_id = %user.user_id,
        organization_id = %organization.id,
        organization_type = %organization.organization_type,
        "Created organization"
    );

    Ok((StatusCode::CREATED, Json(organization)))
}

/// GET /api/v1/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListOrganizationsQuery>,
) -> Result<Json<Paginated<Organization>>, ApiError> {
    user.require_super_admin()?;

    let page = page_request(&state, query.page, query.per_page);
    let (organizations, total) = OrganizationRepository::new(state.pool.clone())
        .list(&query, page)
        .await?;

    Ok(Json(Paginated::new(organizations, page, total)))
}

/// GET /api/v1/organizations/:org_id
pub async fn get_organization(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Organization>, ApiError> {
    user.require_member(org_id)?;

    let organization = OrganizationRepository::new(state.pool.clone())
        .find_by_id(org_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(organization))
}

/// PUT /api/v1/organizations/:org_id
pub async fn update_organization(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<UpdateOrganizationRequest>,
) -> Result<Json<Organization>, ApiError> {
    user.require_org_permission(org_id, Permission::OrganizationManage)?;
    request.validate()?;

    let organization = OrganizationRepository::new(state.pool.clone())
        .update(org_id, &request)
        .await?
        .ok_or_else(not_found)?;

    info!(user_id = %user.user_id, organization_id = %org_id, "Updated organization");
    Ok(Json(organization))
}

/// PUT /api/v1/organizations/:org_id/status
pub async fn update_organization_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<UpdateOrganizationStatusRequest>,
) -> Result<Json<Organization>, ApiError> {
    user.require_super_admin()?;

    let organization = OrganizationRepository::new(state.pool.clone())
        .set_active(org_id, request.is_active)
        .await?
        .ok_or_else(not_found)?;

    info!(
        user_id = %user.user_id,
        organization_id = %org_id,
        is_active = request.is_active,
        "Changed organization status"
    );
    Ok(Json(organization))
}

/// DELETE /api/v1/organizations/:org_id
///
/// Hard delete. Courts, staff, bookings and the rest cascade.
pub async fn delete_organization(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_super_admin()?;

    let deleted = OrganizationRepository::new(state.pool.clone())
        .delete(org_id)
        .await?;
    if !deleted {
        return Err(not_found());
    }

    info!(user_id = %user.user_id, organization_id = %org_id, "Deleted organization");
    Ok(StatusCode::NO_CONTENT)
}

/// Loads the organization and rejects writes against inactive ones.
pub(crate) async fn require_active_organization(
    state: &AppState,
    org_id: Uuid,
) -> Result<Organization, ApiError> {
    let organization = OrganizationRepository::new(state.pool.clone())
        .find_by_id(org_id)
        .await?
        .ok_or_else(not_found)?;
    if !organization.is_active {
        return Err(ApiError::Forbidden("Organization is inactive".into()));
    }
    Ok(organization)
}
