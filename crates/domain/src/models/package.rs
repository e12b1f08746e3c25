//! Hospitality packages and their reservations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::booking::BookingStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub capacity: i32,
    pub duration_nights: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: i64,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be 1-1000"))]
    pub capacity: i32,
    #[validate(range(min = 1, max = 365, message = "Duration must be 1-365 nights"))]
    pub duration_nights: i32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdatePackageRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be 1-1000"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 1, max = 365, message = "Duration must be 1-365 nights"))]
    pub duration_nights: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListPackagesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub is_active: Option<bool>,
}

/// A reservation of a package for a stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageBooking {
    pub id: Uuid,
    pub package_id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub status: BookingStatus,
    pub status_code: i16,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_stay"))]
pub struct CreatePackageBookingRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub guests: i32,
    pub user_id: Option<Uuid>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

fn validate_stay(req: &CreatePackageBookingRequest) -> Result<(), ValidationError> {
    if req.check_in < req.check_out {
        Ok(())
    } else {
        let mut err = ValidationError::new("stay_dates");
        err.message = Some("check_in must be before check_out".into());
        Err(err)
    }
}

impl CreatePackageBookingRequest {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePackageBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListPackageBookingsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<BookingStatus>,
}
