//! Court calendar: slot conflict detection and day schedules.
//!
//! A court is bookable on a date between its opening hours, minus:
//! 1. one-off availability blocks for that date (whole day or a time range)
//! 2. recurring weekly rules for that weekday (0 = Sunday)
//! 3. bookings on that date that are not cancelled
//!
//! All intervals are half-open, so back-to-back slots never conflict.

use chrono::{Datelike, NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::availability::{
    AvailabilityBlock, BlockSource, BlockedInterval, DaySchedule, RecurringUnavailability,
    TimeInterval,
};
use crate::models::booking::Booking;
use crate::models::court::Court;

/// Why a requested slot cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("Start time must be before end time")]
    InvalidRange,

    #[error("Booking exceeds the maximum duration of {max} minutes")]
    TooLong { minutes: i64, max: i64 },

    #[error("Court is open from {opens_at} to {closes_at}")]
    OutsideOpeningHours {
        opens_at: NaiveTime,
        closes_at: NaiveTime,
    },

    #[error("Court is inactive")]
    CourtInactive,

    #[error("Court is unavailable on this date{}", reason_suffix(.reason))]
    Blocked { reason: Option<String> },

    #[error("Court is unavailable every week at this time{}", reason_suffix(.reason))]
    RecurringRule { reason: Option<String> },

    #[error("Slot overlaps an existing booking")]
    Overlap { booking_id: Uuid },
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => format!(": {}", r),
        _ => String::new(),
    }
}

/// Day-of-week code used by recurring rules (0 = Sunday .. 6 = Saturday).
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Everything known about one court on one date.
#[derive(Debug, Clone, Copy)]
pub struct CourtCalendar<'a> {
    pub court: &'a Court,
    pub date: NaiveDate,
    pub blocks: &'a [AvailabilityBlock],
    pub rules: &'a [RecurringUnavailability],
    pub bookings: &'a [Booking],
}

impl<'a> CourtCalendar<'a> {
    pub fn new(
        court: &'a Court,
        date: NaiveDate,
        blocks: &'a [AvailabilityBlock],
        rules: &'a [RecurringUnavailability],
        bookings: &'a [Booking],
    ) -> Self {
        Self {
            court,
            date,
            blocks,
            rules,
            bookings,
        }
    }

    fn opening_hours(&self) -> TimeInterval {
        TimeInterval::new(self.court.opens_at, self.court.closes_at)
    }

    fn block_interval(&self, block: &AvailabilityBlock) -> TimeInterval {
        match (block.start_time, block.end_time) {
            (Some(start), Some(end)) => TimeInterval::new(start, end),
            _ => self.opening_hours(),
        }
    }

    /// Validates a requested slot. Checks run cheapest first and the first
    /// failure wins.
    pub fn check_slot(
        &self,
        start: NaiveTime,
        end: NaiveTime,
        max_minutes: i64,
    ) -> Result<(), AvailabilityError> {
        if start >= end {
            return Err(AvailabilityError::InvalidRange);
        }
        if !self.court.is_active {
            return Err(AvailabilityError::CourtInactive);
        }

        let slot = TimeInterval::new(start, end);
        let minutes = slot.minutes();
        if minutes > max_minutes {
            return Err(AvailabilityError::TooLong {
                minutes,
                max: max_minutes,
            });
        }

        let hours = self.opening_hours();
        if !hours.contains(&slot) {
            return Err(AvailabilityError::OutsideOpeningHours {
                opens_at: hours.start,
                closes_at: hours.end,
            });
        }

        if let Some(block) = self
            .blocks
            .iter()
            .filter(|b| b.block_date == self.date)
            .find(|b| self.block_interval(b).overlaps(&slot))
        {
            return Err(AvailabilityError::Blocked {
                reason: block.reason.clone(),
            });
        }

        let weekday = day_of_week(self.date);
        if let Some(rule) = self
            .rules
            .iter()
            .filter(|r| r.day_of_week == weekday)
            .find(|r| TimeInterval::new(r.start_time, r.end_time).overlaps(&slot))
        {
            return Err(AvailabilityError::RecurringRule {
                reason: rule.reason.clone(),
            });
        }

        if let Some(booking) = self
            .bookings
            .iter()
            .filter(|b| b.booking_date == self.date && b.status.is_active())
            .find(|b| TimeInterval::new(b.start_time, b.end_time).overlaps(&slot))
        {
            return Err(AvailabilityError::Overlap {
                booking_id: booking.id,
            });
        }

        Ok(())
    }

    /// Every unavailable interval on the date, clipped to opening hours and
    /// sorted by start time.
    pub fn blocked_intervals(&self) -> Vec<BlockedInterval> {
        let hours = self.opening_hours();
        let weekday = day_of_week(self.date);

        let blocks = self
            .blocks
            .iter()
            .filter(|b| b.block_date == self.date)
            .map(|b| {
                (
                    self.block_interval(b),
                    BlockSource::AvailabilityBlock,
                    b.id,
                    b.reason.clone(),
                )
            });
        let rules = self
            .rules
            .iter()
            .filter(|r| r.day_of_week == weekday)
            .map(|r| {
                (
                    TimeInterval::new(r.start_time, r.end_time),
                    BlockSource::Recurring,
                    r.id,
                    r.reason.clone(),
                )
            });
        let bookings = self
            .bookings
            .iter()
            .filter(|b| b.booking_date == self.date && b.status.is_active())
            .map(|b| {
                (
                    TimeInterval::new(b.start_time, b.end_time),
                    BlockSource::Booking,
                    b.id,
                    None,
                )
            });

        let mut blocked: Vec<BlockedInterval> = blocks
            .chain(rules)
            .chain(bookings)
            .filter_map(|(interval, source, reference_id, reason)| {
                clip(interval, hours).map(|clipped| BlockedInterval {
                    start: clipped.start,
                    end: clipped.end,
                    source,
                    reference_id,
                    reason,
                })
            })
            .collect();
        blocked.sort_by_key(|b| (b.start, b.end));
        blocked
    }

    /// Opening hours minus every blocked interval.
    pub fn free_intervals(&self) -> Vec<TimeInterval> {
        let busy: Vec<TimeInterval> = self
            .blocked_intervals()
            .iter()
            .map(|b| TimeInterval::new(b.start, b.end))
            .collect();
        subtract(self.opening_hours(), &merge(busy))
    }

    pub fn day_schedule(&self) -> DaySchedule {
        DaySchedule {
            court_id: self.court.id,
            date: self.date,
            opens_at: self.court.opens_at,
            closes_at: self.court.closes_at,
            blocked: self.blocked_intervals(),
            free: self.free_intervals(),
        }
    }
}

fn clip(interval: TimeInterval, bounds: TimeInterval) -> Option<TimeInterval> {
    let start = interval.start.max(bounds.start);
    let end = interval.end.min(bounds.end);
    (start < end).then(|| TimeInterval::new(start, end))
}

/// Merges overlapping or touching intervals.
pub fn merge(mut intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    intervals.sort_by_key(|i| (i.start, i.end));
    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// `range` minus sorted, non-overlapping `busy` intervals.
fn subtract(range: TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut free = Vec::new();
    let mut cursor = range.start;
    for interval in busy {
        if interval.start > cursor {
            free.push(TimeInterval::new(cursor, interval.start.min(range.end)));
        }
        cursor = cursor.max(interval.end);
        if cursor >= range.end {
            break;
        }
    }
    if cursor < range.end {
        free.push(TimeInterval::new(cursor, range.end));
    }
    free
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use chrono::Utc;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2025-03-17 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    fn court() -> Court {
        Court {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Court 1".to_string(),
            sport: "padel".to_string(),
            description: None,
            price_per_hour_cents: 4000,
            opens_at: t(8, 0),
            closes_at: t(22, 0),
            slot_minutes: 60,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn block(court: &Court, date: NaiveDate, times: Option<(NaiveTime, NaiveTime)>) -> AvailabilityBlock {
        AvailabilityBlock {
            id: Uuid::new_v4(),
            court_id: court.id,
            block_date: date,
            start_time: times.map(|(s, _)| s),
            end_time: times.map(|(_, e)| e),
            reason: Some("Maintenance".to_string()),
            created_at: Utc::now(),
        }
    }

    fn rule(court: &Court, day: i16, start: NaiveTime, end: NaiveTime) -> RecurringUnavailability {
        RecurringUnavailability {
            id: Uuid::new_v4(),
            court_id: court.id,
            day_of_week: day,
            start_time: start,
            end_time: end,
            reason: Some("Team training".to_string()),
            created_at: Utc::now(),
        }
    }

    fn booking(court: &Court, start: NaiveTime, end: NaiveTime, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            organization_id: court.organization_id,
            court_id: court.id,
            user_id: Uuid::new_v4(),
            booking_date: monday(),
            start_time: start,
            end_time: end,
            status,
            status_code: status.code(),
            total_price_cents: 4000,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_day_of_week_sunday_is_zero() {
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()), 0);
        assert_eq!(day_of_week(monday()), 1);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 3, 22).unwrap()), 6);
    }

    #[test]
    fn test_free_court_accepts_slot() {
        let court = court();
        let cal = CourtCalendar::new(&court, monday(), &[], &[], &[]);
        assert!(cal.check_slot(t(10, 0), t(11, 0), 240).is_ok());
        assert!(cal.check_slot(t(8, 0), t(9, 0), 240).is_ok());
        assert!(cal.check_slot(t(21, 0), t(22, 0), 240).is_ok());
    }

    #[test]
    fn test_rejects_outside_opening_hours() {
        let court = court();
        let cal = CourtCalendar::new(&court, monday(), &[], &[], &[]);
        assert!(matches!(
            cal.check_slot(t(7, 0), t(9, 0), 240),
            Err(AvailabilityError::OutsideOpeningHours { .. })
        ));
        assert!(matches!(
            cal.check_slot(t(21, 30), t(22, 30), 240),
            Err(AvailabilityError::OutsideOpeningHours { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_and_too_long() {
        let court = court();
        let cal = CourtCalendar::new(&court, monday(), &[], &[], &[]);
        assert_eq!(
            cal.check_slot(t(11, 0), t(10, 0), 240),
            Err(AvailabilityError::InvalidRange)
        );
        assert_eq!(
            cal.check_slot(t(9, 0), t(14, 0), 240),
            Err(AvailabilityError::TooLong {
                minutes: 300,
                max: 240
            })
        );
    }

    #[test]
    fn test_rejects_inactive_court() {
        let mut court = court();
        court.is_active = false;
        let cal = CourtCalendar::new(&court, monday(), &[], &[], &[]);
        assert_eq!(
            cal.check_slot(t(10, 0), t(11, 0), 240),
            Err(AvailabilityError::CourtInactive)
        );
    }

    #[test]
    fn test_whole_day_block() {
        let court = court();
        let blocks = vec![block(&court, monday(), None)];
        let cal = CourtCalendar::new(&court, monday(), &blocks, &[], &[]);
        assert!(matches!(
            cal.check_slot(t(10, 0), t(11, 0), 240),
            Err(AvailabilityError::Blocked { .. })
        ));
        assert!(cal.free_intervals().is_empty());

        let tuesday = monday().succ_opt().unwrap();
        let cal = CourtCalendar::new(&court, tuesday, &blocks, &[], &[]);
        assert!(cal.check_slot(t(10, 0), t(11, 0), 240).is_ok());
    }

    #[test]
    fn test_partial_block_is_half_open() {
        let court = court();
        let blocks = vec![block(&court, monday(), Some((t(12, 0), t(14, 0))))];
        let cal = CourtCalendar::new(&court, monday(), &blocks, &[], &[]);
        assert!(cal.check_slot(t(11, 0), t(12, 0), 240).is_ok());
        assert!(cal.check_slot(t(14, 0), t(15, 0), 240).is_ok());
        assert!(cal.check_slot(t(13, 0), t(15, 0), 240).is_err());
    }

    #[test]
    fn test_recurring_rule_applies_on_matching_weekday_only() {
        let court = court();
        let rules = vec![rule(&court, 1, t(18, 0), t(20, 0))];
        let cal = CourtCalendar::new(&court, monday(), &[], &rules, &[]);
        assert!(matches!(
            cal.check_slot(t(19, 0), t(20, 0), 240),
            Err(AvailabilityError::RecurringRule { .. })
        ));

        let tuesday = monday().succ_opt().unwrap();
        let cal = CourtCalendar::new(&court, tuesday, &[], &rules, &[]);
        assert!(cal.check_slot(t(19, 0), t(20, 0), 240).is_ok());
    }

    #[test]
    fn test_booking_overlap_ignores_cancelled() {
        let court = court();
        let existing = booking(&court, t(10, 0), t(11, 0), BookingStatus::Pending);
        let cancelled = booking(&court, t(15, 0), t(16, 0), BookingStatus::Cancelled);
        let bookings = vec![existing.clone(), cancelled];
        let cal = CourtCalendar::new(&court, monday(), &[], &[], &bookings);

        assert_eq!(
            cal.check_slot(t(10, 30), t(11, 30), 240),
            Err(AvailabilityError::Overlap {
                booking_id: existing.id
            })
        );
        assert!(cal.check_slot(t(11, 0), t(12, 0), 240).is_ok());
        assert!(cal.check_slot(t(15, 0), t(16, 0), 240).is_ok());
    }

    #[test]
    fn test_day_schedule_merges_and_computes_free() {
        let court = court();
        let blocks = vec![block(&court, monday(), Some((t(6, 0), t(9, 0))))];
        let rules = vec![rule(&court, 1, t(12, 0), t(13, 0))];
        let bookings = vec![
            booking(&court, t(12, 30), t(14, 0), BookingStatus::Confirmed),
            booking(&court, t(20, 0), t(22, 0), BookingStatus::Pending),
        ];
        let cal = CourtCalendar::new(&court, monday(), &blocks, &rules, &bookings);
        let schedule = cal.day_schedule();

        assert_eq!(schedule.blocked.len(), 4);
        assert_eq!(schedule.blocked[0].start, t(8, 0));
        assert_eq!(schedule.blocked[0].source, BlockSource::AvailabilityBlock);

        assert_eq!(
            schedule.free,
            vec![
                TimeInterval::new(t(9, 0), t(12, 0)),
                TimeInterval::new(t(14, 0), t(20, 0)),
            ]
        );
    }

    #[test]
    fn test_merge_touching_intervals() {
        let merged = merge(vec![
            TimeInterval::new(t(10, 0), t(11, 0)),
            TimeInterval::new(t(9, 0), t(10, 0)),
            TimeInterval::new(t(13, 0), t(14, 0)),
            TimeInterval::new(t(10, 30), t(12, 0)),
        ]);
        assert_eq!(
            merged,
            vec![
                TimeInterval::new(t(9, 0), t(12, 0)),
                TimeInterval::new(t(13, 0), t(14, 0)),
            ]
        );
    }
}
