//! User account and profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::permission::Permission;

/// Role code stored on every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    ArenaAdmin,
    Sales,
    Employee,
    EducationStaff,
    Coach,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::ArenaAdmin => "arena_admin",
            UserRole::Sales => "sales",
            UserRole::Employee => "employee",
            UserRole::EducationStaff => "education_staff",
            UserRole::Coach => "coach",
            UserRole::Customer => "customer",
        }
    }

    /// Roles that work for a specific organization.
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::SuperAdmin | UserRole::Customer)
    }

    /// Checks the role/organization pairing of an account.
    ///
    /// Super-admins are platform-wide and carry no organization; staff roles
    /// must belong to one; customers may optionally be attached to one.
    pub fn check_organization(&self, organization_id: Option<Uuid>) -> Result<(), &'static str> {
        match (self, organization_id) {
            (UserRole::SuperAdmin, Some(_)) => {
                Err("Super admins cannot belong to an organization")
            }
            (role, None) if role.is_staff() => Err("Staff roles require an organization"),
            _ => Ok(()),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "super_admin" => Ok(UserRole::SuperAdmin),
            "arena_admin" => Ok(UserRole::ArenaAdmin),
            "sales" => Ok(UserRole::Sales),
            "employee" => Ok(UserRole::Employee),
            "education_staff" => Ok(UserRole::EducationStaff),
            "coach" => Ok(UserRole::Coach),
            "customer" => Ok(UserRole::Customer),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile. The password hash never leaves the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile of the calling user including their effective permissions.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub permissions: Vec<Permission>,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        let permissions = user.role.permissions().to_vec();
        Self { user, permissions }
    }
}

/// Request to create an account (super-admin only).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub role: Option<UserRole>,
    pub organization_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Request to change a user's role and organization.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
}

/// Request to enable or disable an account.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

/// Request to update the caller's own profile.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Request to change the caller's password.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}
