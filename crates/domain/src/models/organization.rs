//! Organization (tenant) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Kind of facility an organization operates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    Arena,
    LivingSpace,
    Hospitality,
    Education,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::Arena => "arena",
            OrganizationType::LivingSpace => "living_space",
            OrganizationType::Hospitality => "hospitality",
            OrganizationType::Education => "education",
        }
    }
}

impl FromStr for OrganizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arena" => Ok(OrganizationType::Arena),
            "living_space" => Ok(OrganizationType::LivingSpace),
            "hospitality" => Ok(OrganizationType::Hospitality),
            "education" => Ok(OrganizationType::Education),
            _ => Err(format!("Unknown organization type: {}", s)),
        }
    }
}

impl std::fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organization domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub organization_type: OrganizationType,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    pub organization_type: OrganizationType,
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,
    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,
    #[validate(email(message = "Invalid contact email format"))]
    pub contact_email: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub contact_phone: Option<String>,
}

/// Request to update an organization. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: Option<String>,
    pub organization_type: Option<OrganizationType>,
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,
    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,
    #[validate(email(message = "Invalid contact email format"))]
    pub contact_email: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub contact_phone: Option<String>,
}

/// Request to activate or deactivate an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrganizationStatusRequest {
    pub is_active: bool,
}

/// Query parameters for listing organizations.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListOrganizationsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub organization_type: Option<OrganizationType>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}
