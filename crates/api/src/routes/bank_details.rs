//! Organization payout bank details.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::bank_details::UpsertBankDetailsRequest;
use domain::models::{BankDetails, Permission};
use persistence::repositories::BankDetailsRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// GET /api/v1/organizations/:org_id/bank-details
pub async fn get_bank_details(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<BankDetails>, ApiError> {
    user.require_org_permission(org_id, Permission::BankManage)?;

    let details = BankDetailsRepository::new(state.pool.clone())
        .find(org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bank details not found".into()))?;
    Ok(Json(details))
}

/// PUT /api/v1/organizations/:org_id/bank-details
///
/// One record per organization; a second call overwrites the first.
pub async fn upsert_bank_details(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<UpsertBankDetailsRequest>,
) -> Result<Json<BankDetails>, ApiError> {
    user.require_org_permission(org_id, Permission::BankManage)?;
    request.validate()?;

    let details = BankDetailsRepository::new(state.pool.clone())
        .upsert(org_id, user.user_id, &request)
        .await?;

    // Account numbers stay out of the logs.
    info!(user_id = %user.user_id, organization_id = %org_id, "Updated bank details");
    Ok(Json(details))
}
