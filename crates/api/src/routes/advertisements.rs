//! Advertisement routes. Management is super-admin only; the live feed is
//! public.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::advertisement::{
    check_ad_window, CreateAdvertisementRequest, ListAdvertisementsQuery,
    PublicAdvertisementsQuery, UpdateAdvertisementRequest,
};
use domain::models::Advertisement;
use persistence::repositories::AdvertisementRepository;
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
    ApiError::NotFound("Advertisement not found".into())
}

/// POST /api/v1/advertisements
pub async fn create_advertisement(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateAdvertisementRequest>,
) -> Result<(StatusCode, Json<Advertisement>), ApiError> {
    user.require_super_admin()?;
    request.validate()?;

    let ad = AdvertisementRepository::new(state.pool.clone())
        .create(&request)
        .await?;

    info!(
        user_id = %user.user_id,
        ad_id = %ad.id,
        placement = %ad.placement,
        "Created advertisement"
    );
    Ok((StatusCode::CREATED, Json(ad)))
}

/// GET /api/v1/advertisements
pub async fn list_advertisements(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListAdvertisementsQuery>,
) -> Result<Json<Paginated<Advertisement>>, ApiError> {
    user.require_super_admin()?;

    let page = page_request(&state, query.page, query.per_page);
    let (ads, total) = AdvertisementRepository::new(state.pool.clone())
        .list(&query, page)
        .await?;
    Ok(Json(Paginated::new(ads, page, total)))
}

/// GET /api/v1/advertisements/:ad_id
pub async fn get_advertisement(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ad_id): Path<Uuid>,
) -> Result<Json<Advertisement>, ApiError> {
    user.require_super_admin()?;

    let ad = AdvertisementRepository::new(state.pool.clone())
        .find(ad_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ad))
}

/// PUT /api/v1/advertisements/:ad_id
pub async fn update_advertisement(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ad_id): Path<Uuid>,
    Json(request): Json<UpdateAdvertisementRequest>,
) -> Result<Json<Advertisement>, ApiError> {
    user.require_super_admin()?;
    request.validate()?;

    let repo = AdvertisementRepository::new(state.pool.clone());
    if request.starts_at.is_some() || request.ends_at.is_some() {
        let existing = repo.find(ad_id).await?.ok_or_else(not_found)?;
        let (starts_at, ends_at) = request.effective_window(&existing);
        check_ad_window(starts_at, ends_at).map_err(validation_message)?;
    }

    let ad = repo.update(ad_id, &request).await?.ok_or_else(not_found)?;

    info!(user_id = %user.user_id, ad_id = %ad_id, "Updated advertisement");
    Ok(Json(ad))
}

/// DELETE /api/v1/advertisements/:ad_id
pub async fn delete_advertisement(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ad_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_super_admin()?;

    if !AdvertisementRepository::new(state.pool.clone())
        .delete(ad_id)
        .await?
    {
        return Err(not_found());
    }

    info!(user_id = %user.user_id, ad_id = %ad_id, "Deleted advertisement");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/public/advertisements
///
/// Active ads whose window contains the current time. No authentication.
pub async fn list_live_advertisements(
    State(state): State<AppState>,
    Query(query): Query<PublicAdvertisementsQuery>,
) -> Result<Json<Vec<Advertisement>>, ApiError> {
    let ads = AdvertisementRepository::new(state.pool.clone())
        .live(query.placement, Utc::now())
        .await?;
    Ok(Json(ads))
}
