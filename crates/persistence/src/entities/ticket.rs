//! Ticket and ticket message entities.

use chrono::{DateTime, Utc};
use domain::models::{TicketPriority, TicketStatus};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserRoleDb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
pub enum TicketStatusDb {
    Open,
    InProgress,
    Closed,
}

impl From<TicketStatusDb> for TicketStatus {
    fn from(db: TicketStatusDb) -> Self {
        match db {
            TicketStatusDb::Open => Self::Open,
            TicketStatusDb::InProgress => Self::InProgress,
            TicketStatusDb::Closed => Self::Closed,
        }
    }
}

impl From<TicketStatus> for TicketStatusDb {
    fn from(domain: TicketStatus) -> Self {
        match domain {
            TicketStatus::Open => Self::Open,
            TicketStatus::InProgress => Self::InProgress,
            TicketStatus::Closed => Self::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ticket_priority", rename_all = "lowercase")]
pub enum TicketPriorityDb {
    Low,
    Normal,
    High,
    Urgent,
}

impl From<TicketPriorityDb> for TicketPriority {
    fn from(db: TicketPriorityDb) -> Self {
        match db {
            TicketPriorityDb::Low => Self::Low,
            TicketPriorityDb::Normal => Self::Normal,
            TicketPriorityDb::High => Self::High,
            TicketPriorityDb::Urgent => Self::Urgent,
        }
    }
}

impl From<TicketPriority> for TicketPriorityDb {
    fn from(domain: TicketPriority) -> Self {
        match domain {
            TicketPriority::Low => Self::Low,
            TicketPriority::Normal => Self::Normal,
            TicketPriority::High => Self::High,
            TicketPriority::Urgent => Self::Urgent,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketEntity {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub created_by: Uuid,
    pub subject: String,
    pub status: TicketStatusDb,
    pub priority: TicketPriorityDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<TicketEntity> for domain::models::Ticket {
    fn from(entity: TicketEntity) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            created_by: entity.created_by,
            subject: entity.subject,
            status: entity.status.into(),
            priority: entity.priority.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            closed_at: entity.closed_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketMessageEntity {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub author_role: UserRoleDb,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<TicketMessageEntity> for domain::models::TicketMessage {
    fn from(entity: TicketMessageEntity) -> Self {
        Self {
            id: entity.id,
            ticket_id: entity.ticket_id,
            author_id: entity.author_id,
            author_role: entity.author_role.into(),
            body: entity.body,
            created_at: entity.created_at,
        }
    }
}
