//! Dashboard statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::booking::BookingStatus;

/// Booking counts by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingBreakdown {
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
}

impl BookingBreakdown {
    /// Builds the breakdown from `(status_code, count)` rows.
    pub fn from_counts(rows: &[(i16, i64)]) -> Self {
        let mut breakdown = Self::default();
        for (code, count) in rows {
            match BookingStatus::from_code(*code) {
                Some(BookingStatus::Pending) => breakdown.pending += count,
                Some(BookingStatus::Confirmed) => breakdown.confirmed += count,
                Some(BookingStatus::Cancelled) => breakdown.cancelled += count,
                None => {}
            }
        }
        breakdown
    }

    pub fn total(&self) -> i64 {
        self.pending + self.confirmed + self.cancelled
    }
}

/// Per-organization dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationDashboard {
    pub organization_id: Uuid,
    pub courts: i64,
    pub active_staff: i64,
    pub bookings: BookingBreakdown,
    pub upcoming_events: i64,
    pub open_tickets: i64,
    /// Confirmed booking revenue since the first of the current month.
    pub revenue_this_month_cents: i64,
    pub generated_at: DateTime<Utc>,
}

/// Platform-wide statistics for super-admins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminStats {
    pub organizations_total: i64,
    pub organizations_by_type: BTreeMap<String, i64>,
    pub users_total: i64,
    pub users_by_role: BTreeMap<String, i64>,
    pub bookings_total: i64,
    pub open_tickets: i64,
    pub generated_at: DateTime<Utc>,
}

impl AdminStats {
    pub fn new(
        organizations_by_type: Vec<(String, i64)>,
        users_by_role: Vec<(String, i64)>,
        bookings_total: i64,
        open_tickets: i64,
    ) -> Self {
        let organizations_by_type: BTreeMap<String, i64> =
            organizations_by_type.into_iter().collect();
        let users_by_role: BTreeMap<String, i64> = users_by_role.into_iter().collect();
        Self {
            organizations_total: organizations_by_type.values().sum(),
            users_total: users_by_role.values().sum(),
            organizations_by_type,
            users_by_role,
            bookings_total,
            open_tickets,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_breakdown_from_counts() {
        let breakdown = BookingBreakdown::from_counts(&[(0, 3), (1, 10), (2, 4), (9, 100)]);
        assert_eq!(breakdown.cancelled, 3);
        assert_eq!(breakdown.confirmed, 10);
        assert_eq!(breakdown.pending, 4);
        assert_eq!(breakdown.total(), 17);
    }

    #[test]
    fn test_admin_stats_totals() {
        let stats = AdminStats::new(
            vec![("arena".to_string(), 2), ("education".to_string(), 1)],
            vec![("customer".to_string(), 40), ("coach".to_string(), 5)],
            120,
            7,
        );
        assert_eq!(stats.organizations_total, 3);
        assert_eq!(stats.users_total, 45);
        assert_eq!(stats.organizations_by_type["arena"], 2);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["users_by_role"]["coach"], 5);
        assert_eq!(json["bookings_total"], 120);
    }
}
