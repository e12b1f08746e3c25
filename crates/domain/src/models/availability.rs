//! Court availability: one-off dated blocks, weekly recurring rules and the
//! computed day schedule.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A dated exception marking a court unavailable for all or part of a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub id: Uuid,
    pub court_id: Uuid,
    pub block_date: NaiveDate,
    /// `None` together with `end_time` means the whole day.
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityBlock {
    pub fn is_whole_day(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

/// A weekly rule blocking a court during fixed hours on one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringUnavailability {
    pub id: Uuid,
    pub court_id: Uuid,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One entry of an availability replacement payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_block_input"))]
pub struct AvailabilityBlockInput {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 255, message = "Reason must be at most 255 characters"))]
    pub reason: Option<String>,
}

fn validate_block_input(input: &AvailabilityBlockInput) -> Result<(), ValidationError> {
    match (input.start_time, input.end_time) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) => check_time_order(start, end),
        _ => {
            let mut err = ValidationError::new("partial_block");
            err.message =
                Some("Provide both start_time and end_time, or neither for a whole day".into());
            Err(err)
        }
    }
}

/// `start` must be strictly before `end`.
pub fn check_time_order(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if start < end {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_order");
        err.message = Some("start_time must be before end_time".into());
        Err(err)
    }
}

/// Replaces every one-off block of a court. An empty list clears them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetAvailabilityRequest {
    #[validate(nested)]
    #[serde(default)]
    pub blocks: Vec<AvailabilityBlockInput>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AvailabilityRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_recurring_input"))]
pub struct CreateRecurringUnavailabilityRequest {
    #[validate(range(min = 0, max = 6, message = "Day of week must be 0 (Sunday) to 6 (Saturday)"))]
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(max = 255, message = "Reason must be at most 255 characters"))]
    pub reason: Option<String>,
}

fn validate_recurring_input(
    input: &CreateRecurringUnavailabilityRequest,
) -> Result<(), ValidationError> {
    check_time_order(input.start_time, input.end_time)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleQuery {
    pub date: NaiveDate,
}

/// Half-open time interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// What makes a stretch of the day unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSource {
    AvailabilityBlock,
    Recurring,
    Booking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub source: BlockSource,
    pub reference_id: Uuid,
    pub reason: Option<String>,
}

/// Computed view of one court on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub blocked: Vec<BlockedInterval>,
    pub free: Vec<TimeInterval>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_block_input_whole_day_valid() {
        let input = AvailabilityBlockInput {
            date: d(),
            start_time: None,
            end_time: None,
            reason: Some("Resurfacing".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_block_input_partial_invalid() {
        let input = AvailabilityBlockInput {
            date: d(),
            start_time: Some(t(9, 0)),
            end_time: None,
            reason: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_block_input_inverted_invalid() {
        let input = AvailabilityBlockInput {
            date: d(),
            start_time: Some(t(12, 0)),
            end_time: Some(t(9, 0)),
            reason: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_set_availability_nested_validation() {
        let req = SetAvailabilityRequest {
            blocks: vec![
                AvailabilityBlockInput {
                    date: d(),
                    start_time: Some(t(9, 0)),
                    end_time: Some(t(10, 0)),
                    reason: None,
                },
                AvailabilityBlockInput {
                    date: d(),
                    start_time: Some(t(11, 0)),
                    end_time: Some(t(10, 0)),
                    reason: None,
                },
            ],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_set_availability_empty_list() {
        let req: SetAvailabilityRequest = serde_json::from_str(r#"{"blocks": []}"#).unwrap();
        assert!(req.blocks.is_empty());
        assert!(req.validate().is_ok());

        let req: SetAvailabilityRequest = serde_json::from_str("{}").unwrap();
        assert!(req.blocks.is_empty());
    }

    #[test]
    fn test_recurring_request_validation() {
        let ok = CreateRecurringUnavailabilityRequest {
            day_of_week: 1,
            start_time: t(6, 0),
            end_time: t(8, 0),
            reason: Some("Cleaning".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad_day = CreateRecurringUnavailabilityRequest {
            day_of_week: 7,
            ..ok.clone()
        };
        assert!(bad_day.validate().is_err());

        let inverted = CreateRecurringUnavailabilityRequest {
            start_time: t(8, 0),
            end_time: t(6, 0),
            ..ok
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_time_interval_overlap_is_half_open() {
        let a = TimeInterval::new(t(9, 0), t(10, 0));
        let b = TimeInterval::new(t(10, 0), t(11, 0));
        let c = TimeInterval::new(t(9, 30), t(10, 30));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
        assert_eq!(a.minutes(), 60);
        assert!(TimeInterval::new(t(8, 0), t(12, 0)).contains(&c));
    }
}
