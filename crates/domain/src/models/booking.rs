//! Court booking models and the booking status lifecycle.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::availability::check_time_order;

/// Booking lifecycle state, stored as a small integer code.
///
/// Codes: `0` cancelled, `1` confirmed, `2` pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Cancelled,
    Confirmed,
    Pending,
}

impl BookingStatus {
    pub fn code(&self) -> i16 {
        match self {
            BookingStatus::Cancelled => 0,
            BookingStatus::Confirmed => 1,
            BookingStatus::Pending => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(BookingStatus::Cancelled),
            1 => Some(BookingStatus::Confirmed),
            2 => Some(BookingStatus::Pending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
        }
    }

    /// Whether this booking still occupies its slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cancelled" | "0" => Ok(BookingStatus::Cancelled),
            "confirmed" | "1" => Ok(BookingStatus::Confirmed),
            "pending" | "2" => Ok(BookingStatus::Pending),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation of a court timeslot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub court_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub status_code: i16,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_booking_times"))]
pub struct CreateBookingRequest {
    pub court_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Book on behalf of another user (staff only).
    pub user_id: Option<Uuid>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

fn validate_booking_times(req: &CreateBookingRequest) -> Result<(), ValidationError> {
    check_time_order(req.start_time, req.end_time)
}

impl CreateBookingRequest {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListBookingsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub court_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MyBookingsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BookingStatus::Cancelled.code(), 0);
        assert_eq!(BookingStatus::Confirmed.code(), 1);
        assert_eq!(BookingStatus::Pending.code(), 2);
        for code in 0..=2 {
            assert_eq!(BookingStatus::from_code(code).unwrap().code(), code);
        }
        assert!(BookingStatus::from_code(3).is_none());
        assert!(BookingStatus::from_code(-1).is_none());
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_status_is_active() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn test_status_from_str_accepts_codes_and_names() {
        assert_eq!(BookingStatus::from_str("confirmed").unwrap(), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::from_str("0").unwrap(), BookingStatus::Cancelled);
        assert_eq!(BookingStatus::from_str("PENDING").unwrap(), BookingStatus::Pending);
        assert!(BookingStatus::from_str("refunded").is_err());
    }

    #[test]
    fn test_create_booking_validation() {
        let json = r#"{
            "court_id": "6f1c1c1e-2f0a-4a8e-9b65-2a0f7d9f7d11",
            "booking_date": "2025-06-01",
            "start_time": "10:00:00",
            "end_time": "11:30:00"
        }"#;
        let req: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.duration_minutes(), 90);

        let inverted = CreateBookingRequest {
            start_time: req.end_time,
            end_time: req.start_time,
            ..req
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_booking_serializes_status_name_and_code() {
        let booking = Booking {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            booking_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            status: BookingStatus::Pending,
            status_code: BookingStatus::Pending.code(),
            total_price_cents: 4000,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["status_code"], 2);
    }
}
