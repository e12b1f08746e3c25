//! Organization event models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub is_published: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_event_window"))]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub is_published: Option<bool>,
}

fn validate_create_event_window(req: &CreateEventRequest) -> Result<(), ValidationError> {
    check_event_window(req.starts_at, req.ends_at)
}

pub fn check_event_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if starts_at < ends_at {
        Ok(())
    } else {
        let mut err = ValidationError::new("event_window");
        err.message = Some("starts_at must be before ends_at".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub is_published: Option<bool>,
}

impl UpdateEventRequest {
    pub fn effective_window(&self, event: &Event) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.starts_at.unwrap_or(event.starts_at),
            self.ends_at.unwrap_or(event.ends_at),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListEventsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_event_valid() {
        let json = r#"{
            "title": "Summer Tournament",
            "starts_at": "2025-07-01T09:00:00Z",
            "ends_at": "2025-07-01T18:00:00Z",
            "capacity": 64
        }"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.is_published.is_none());
    }

    #[test]
    fn test_create_event_rejects_inverted_window() {
        let now = Utc::now();
        let req = CreateEventRequest {
            title: "Clinic".to_string(),
            description: None,
            location: None,
            starts_at: now,
            ends_at: now - Duration::hours(1),
            capacity: None,
            is_published: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_rejects_zero_capacity_and_blank_title() {
        let now = Utc::now();
        let req = CreateEventRequest {
            title: "   ".to_string(),
            description: None,
            location: None,
            starts_at: now,
            ends_at: now + Duration::hours(2),
            capacity: Some(0),
            is_published: Some(true),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("capacity"));
    }
}
