//! Court (bookable resource) models.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_SLOT_MINUTES: i32 = 60;

/// A bookable court belonging to an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub sport: String,
    pub description: Option<String>,
    pub price_per_hour_cents: i64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub slot_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a court.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_court_hours"))]
pub struct CreateCourtRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Sport must be 1-50 characters"))]
    pub sport: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_per_hour_cents: i64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    #[validate(range(min = 15, max = 240, message = "Slot length must be 15-240 minutes"))]
    pub slot_minutes: Option<i32>,
}

fn validate_create_court_hours(req: &CreateCourtRequest) -> Result<(), ValidationError> {
    check_opening_hours(req.opens_at, req.closes_at)
}

/// Opening time must be strictly before closing time.
pub fn check_opening_hours(opens_at: NaiveTime, closes_at: NaiveTime) -> Result<(), ValidationError> {
    if opens_at < closes_at {
        Ok(())
    } else {
        let mut err = ValidationError::new("opening_hours");
        err.message = Some("Court must open before it closes".into());
        Err(err)
    }
}

/// Request to update a court. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateCourtRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Sport must be 1-50 characters"))]
    pub sport: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_per_hour_cents: Option<i64>,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    #[validate(range(min = 15, max = 240, message = "Slot length must be 15-240 minutes"))]
    pub slot_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateCourtRequest {
    /// Opening hours after applying this update to an existing court.
    pub fn effective_hours(&self, court: &Court) -> (NaiveTime, NaiveTime) {
        (
            self.opens_at.unwrap_or(court.opens_at),
            self.closes_at.unwrap_or(court.closes_at),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListCourtsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub is_active: Option<bool>,
    pub sport: Option<String>,
}
