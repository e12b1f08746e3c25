//! Staff membership models (employees, sales, coaches, education staff).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::UserRole;

/// A staff member: the user profile joined with its organization link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub position: Option<String>,
    pub specialization: Option<String>,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

/// Request to create a staff account inside an organization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    pub role: UserRole,
    #[validate(length(max = 100, message = "Position must be at most 100 characters"))]
    pub position: Option<String>,
    #[validate(length(max = 100, message = "Specialization must be at most 100 characters"))]
    pub specialization: Option<String>,
}

/// Request to update a staff member's profile and position.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Position must be at most 100 characters"))]
    pub position: Option<String>,
    #[validate(length(max = 100, message = "Specialization must be at most 100 characters"))]
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListStaffQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_staff_request_deserialization() {
        let json = r#"{
            "email": "coach@academy.example",
            "password": "Courtside99",
            "display_name": "Coach Kim",
            "role": "coach",
            "specialization": "Tennis"
        }"#;
        let req: CreateStaffRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.role, UserRole::Coach);
        assert_eq!(req.specialization.as_deref(), Some("Tennis"));
        assert!(req.position.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_staff_request_rejects_long_position() {
        let req = CreateStaffRequest {
            email: "x@example.com".to_string(),
            password: "Courtside99".to_string(),
            display_name: "X".to_string(),
            phone: None,
            role: UserRole::Employee,
            position: Some("p".repeat(101)),
            specialization: None,
        };
        assert!(req.validate().is_err());
    }
}
