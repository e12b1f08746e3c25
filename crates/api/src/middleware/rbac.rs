//! Role-based access control.
//!
//! `current_user` resolves the authenticated account and stores a
//! [`CurrentUser`] in request extensions. Handlers then ask it for the
//! permission and organization checks they need.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::{Permission, UserRole};
use persistence::repositories::UserRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// The calling account as of this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
}

impl CurrentUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// Super-admins belong to every organization.
    pub fn belongs_to(&self, organization_id: Uuid) -> bool {
        self.is_super_admin() || self.organization_id == Some(organization_id)
    }

    pub fn require_super_admin(&self) -> Result<(), ApiError> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Super admin access required".into()))
        }
    }

    pub fn require_permission(&self, permission: Permission) -> Result<(), ApiError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Missing permission: {}",
                permission
            )))
        }
    }

    pub fn require_member(&self, organization_id: Uuid) -> Result<(), ApiError> {
        if self.belongs_to(organization_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You are not a member of this organization".into(),
            ))
        }
    }

    /// Member of the organization and holder of the permission.
    pub fn require_org_permission(
        &self,
        organization_id: Uuid,
        permission: Permission,
    ) -> Result<(), ApiError> {
        self.require_member(organization_id)?;
        self.require_permission(permission)
    }

    /// Staff permission in the organization, or the caller acting on their
    /// own resource.
    pub fn is_self_or_org_permission(
        &self,
        owner_id: Uuid,
        organization_id: Uuid,
        permission: Permission,
    ) -> bool {
        owner_id == self.user_id
            || (self.belongs_to(organization_id) && self.has_permission(permission))
    }
}

/// Loads the account behind [`UserAuth`]. Disabled accounts get 403 even
/// while their access token is still valid.
pub async fn current_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth) = req.extensions().get::<UserAuth>().cloned() else {
        tracing::warn!("current_user middleware called without UserAuth in extensions");
        return ApiError::Unauthorized("Authentication required".into()).into_response();
    };

    let repo = UserRepository::new(state.pool.clone());
    let user = match repo.find_by_id(auth.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return ApiError::Unauthorized("Account no longer exists".into()).into_response();
        }
        Err(e) => return ApiError::from(e).into_response(),
    };

    if !user.is_active {
        return ApiError::Forbidden("Account is disabled".into()).into_response();
    }

    req.extensions_mut().insert(CurrentUser {
        user_id: user.id,
        role: user.role.into(),
        organization_id: user.organization_id,
    });
    next.run(req).await
}

/// Route layer for the `/admin` surface. Must run after `current_user`.
pub async fn require_super_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.is_super_admin() => next.run(req).await,
        Some(_) => ApiError::Forbidden("Super admin access required".into()).into_response(),
        None => ApiError::Unauthorized("Authentication required".into()).into_response(),
    }
}
