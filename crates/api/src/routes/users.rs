//! Platform user administration (super-admin only).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::user::{
    CreateUserRequest, ListUsersQuery, UpdateUserRoleRequest, UpdateUserStatusRequest,
};
use domain::models::User;
use persistence::repositories::{NewUser, UserRepository};
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
    ApiError::NotFound("User not found".into())
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    current.require_super_admin()?;
    request.validate()?;
    request
        .role
        .check_organization(request.organization_id)
        .map_err(|msg| ApiError::Validation(msg.into()))?;
    validate_password_policy(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let user = UserRepository::new(state.pool.clone())
        .create(NewUser {
            email: &request.email,
            password_hash: &password_hash,
            display_name: &request.display_name,
            phone: request.phone.as_deref(),
            role: request.role,
            organization_id: request.organization_id,
        })
        .await?;

    info!(
        user_id = %current.user_id,
        created_user_id = %user.id,
        role = %user.role,
        "Created user"
    );
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Paginated<User>>, ApiError> {
    current.require_super_admin()?;

    let page = page_request(&state, query.page, query.per_page);
    let (users, total) = UserRepository::new(state.pool.clone())
        .list(&query, page)
        .await?;
    Ok(Json(Paginated::new(users, page, total)))
}

/// GET /api/v1/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    current.require_super_admin()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/:user_id/role
pub async fn update_user_role(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRoleRequest>,
) -> Result<Json<User>, ApiError> {
    current.require_super_admin()?;
    request
        .role
        .check_organization(request.organization_id)
        .map_err(|msg| ApiError::Validation(msg.into()))?;

    let user = UserRepository::new(state.pool.clone())
        .update_role(user_id, request.role, request.organization_id)
        .await?
        .ok_or_else(not_found)?;

    info!(
        user_id = %current.user_id,
        target_user_id = %user_id,
        role = %request.role,
        "Changed user role"
    );
    Ok(Json(user))
}

/// PUT /api/v1/users/:user_id/status
pub async fn update_user_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserStatusRequest>,
) -> Result<Json<User>, ApiError> {
    current.require_super_admin()?;
    if user_id == current.user_id && !request.is_active {
        return Err(ApiError::Validation(
            "You cannot disable your own account".into(),
        ));
    }

    let user = UserRepository::new(state.pool.clone())
        .set_active(user_id, request.is_active)
        .await?
        .ok_or_else(not_found)?;

    info!(
        user_id = %current.user_id,
        target_user_id = %user_id,
        is_active = request.is_active,
        "Changed user status"
    );
    Ok(Json(user))
}
