//! Court and availability entities (database row mappings).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CourtEntity {
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

impl From<CourtEntity> for domain::models::Court {
    fn from(entity: CourtEntity) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            name: entity.name,
            sport: entity.sport,
            description: entity.description,
            price_per_hour_cents: entity.price_per_hour_cents,
            opens_at: entity.opens_at,
            closes_at: entity.closes_at,
            slot_minutes: entity.slot_minutes,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AvailabilityBlockEntity {
    pub id: Uuid,
    pub court_id: Uuid,
    pub block_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AvailabilityBlockEntity> for domain::models::AvailabilityBlock {
    fn from(entity: AvailabilityBlockEntity) -> Self {
        Self {
            id: entity.id,
            court_id: entity.court_id,
            block_date: entity.block_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            reason: entity.reason,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RecurringUnavailabilityEntity {
    pub id: Uuid,
    pub court_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RecurringUnavailabilityEntity> for domain::models::RecurringUnavailability {
    fn from(entity: RecurringUnavailabilityEntity) -> Self {
        Self {
            id: entity.id,
            court_id: entity.court_id,
            day_of_week: entity.day_of_week,
            start_time: entity.start_time,
            end_time: entity.end_time,
            reason: entity.reason,
            created_at: entity.created_at,
        }
    }
}
