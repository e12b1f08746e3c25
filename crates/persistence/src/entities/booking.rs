//! Court and package booking entities.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::BookingStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Maps a stored status code. Codes outside the CHECK constraint read as
/// cancelled so they never hold a slot.
pub fn status_from_code(code: i16) -> BookingStatus {
    BookingStatus::from_code(code).unwrap_or(BookingStatus::Cancelled)
}

#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub court_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: i16,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingEntity> for domain::models::Booking {
    fn from(entity: BookingEntity) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            court_id: entity.court_id,
            user_id: entity.user_id,
            booking_date: entity.booking_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status: status_from_code(entity.status),
            status_code: entity.status,
            total_price_cents: entity.total_price_cents,
            notes: entity.notes,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PackageBookingEntity {
    pub id: Uuid,
    pub package_id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub status: i16,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PackageBookingEntity> for domain::models::PackageBooking {
    fn from(entity: PackageBookingEntity) -> Self {
        Self {
            id: entity.id,
            package_id: entity.package_id,
            organization_id: entity.organization_id,
            user_id: entity.user_id,
            check_in: entity.check_in,
            check_out: entity.check_out,
            guests: entity.guests,
            status: status_from_code(entity.status),
            status_code: entity.status,
            total_price_cents: entity.total_price_cents,
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
