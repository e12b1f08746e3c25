//! Dashboard statistics.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::dashboard::{AdminStats, OrganizationDashboard};
use domain::models::Permission;
use persistence::repositories::DashboardRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// GET /api/v1/organizations/:org_id/dashboard
pub async fn get_organization_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<OrganizationDashboard>, ApiError> {
    user.require_org_permission(org_id, Permission::DashboardRead)?;

    let dashboard = DashboardRepository::new(state.pool.clone())
        .organization_dashboard(org_id)
        .await?;
    Ok(Json(dashboard))
}

/// GET /api/v1/admin/stats
pub async fn get_admin_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AdminStats>, ApiError> {
    user.require_super_admin()?;

    let stats = DashboardRepository::new(state.pool.clone())
        .admin_stats()
        .await?;
    Ok(Json(stats))
}
