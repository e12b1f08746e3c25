//! Ticket repository.

use domain::models::ticket::TicketWithMessages;
use domain::models::{Ticket, TicketMessage, TicketPriority, TicketStatus, UserRole};
use shared::pagination::PageRequest;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::ticket::{TicketEntity, TicketMessageEntity, TicketPriorityDb, TicketStatusDb};
use crate::entities::user::UserRoleDb;
use crate::metrics::QueryTimer;

const TICKET_COLUMNS: &str =
    "id, organization_id, created_by, subject, status, priority, created_at, updated_at, closed_at";
const MESSAGE_COLUMNS: &str = "id, ticket_id, author_id, author_role, body, created_at";

/// Which tickets a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    All,
    /// Tickets of one organization plus the caller's own.
    Organization { organization_id: Uuid, user_id: Uuid },
    Own { user_id: Uuid },
}

#[derive(Debug, Error)]
pub enum TicketWriteError {
    #[error("Ticket not found")]
    NotFound,

    #[error("Ticket is closed")]
    Closed,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a ticket and its first message in one transaction.
    pub async fn create(
        &self,
        organization_id: Option<Uuid>,
        author_id: Uuid,
        author_role: UserRole,
        subject: &str,
        priority: TicketPriority,
        message: &str,
    ) -> Result<TicketWithMessages, sqlx::Error> {
        let timer = QueryTimer::new("ticket", "create_ticket");
        let mut tx = self.pool.begin().await?;

        let ticket = sqlx::query_as::<_, TicketEntity>(&format!(
            r#"
            INSERT INTO tickets (organization_id, created_by, subject, priority)
            VALUES ($1, $2, $3, $4)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(author_id)
        .bind(subject.trim())
        .bind(TicketPriorityDb::from(priority))
        .fetch_one(&mut *tx)
        .await?;

        let first = insert_message(&mut *tx, ticket.id, author_id, author_role, message).await?;

        tx.commit().await?;
        timer.record();
        Ok(TicketWithMessages {
            ticket: ticket.into(),
            messages: vec![first],
        })
    }

    pub async fn find(&self, ticket_id: Uuid) -> Result<Option<Ticket>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TicketEntity>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    /// Messages of a ticket in posting order.
    pub async fn messages(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, sqlx::Error> {
        let entities = sqlx::query_as::<_, TicketMessageEntity>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM ticket_messages
            WHERE ticket_id = $1
            ORDER BY created_at, id
            "#
        ))
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn list(
        &self,
        scope: TicketScope,
        status: Option<TicketStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Ticket>, i64), sqlx::Error> {
        let timer = QueryTimer::new("ticket", "list_tickets");
        let (organization_id, user_id) = match scope {
            TicketScope::All => (None, None),
            TicketScope::Organization {
                organization_id,
                user_id,
            } => (Some(organization_id), Some(user_id)),
            TicketScope::Own { user_id } => (None, Some(user_id)),
        };
        let status = status.map(TicketStatusDb::from);

        // $1 org, $2 user: org scope matches either, own scope matches the user.
        let filter = r#"
            WHERE (
                ($1::uuid IS NULL AND $2::uuid IS NULL)
                OR ($1::uuid IS NOT NULL AND (organization_id = $1 OR created_by = $2))
                OR ($1::uuid IS NULL AND created_by = $2)
            )
            AND ($3::ticket_status IS NULL OR status = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tickets {filter}"))
            .bind(organization_id)
            .bind(user_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let entities = sqlx::query_as::<_, TicketEntity>(&format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM tickets
            {filter}
            ORDER BY updated_at DESC, id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(organization_id)
        .bind(user_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Append a message. A staff reply moves an open ticket to in progress.
    pub async fn post_message(
        &self,
        ticket_id: Uuid,
        author_id: Uuid,
        author_role: UserRole,
        body: &str,
        is_staff_reply: bool,
    ) -> Result<TicketMessage, TicketWriteError> {
        let timer = QueryTimer::new("ticket", "post_ticket_message");
        let mut tx = self.pool.begin().await?;

        let status: TicketStatusDb =
            sqlx::query_scalar("SELECT status FROM tickets WHERE id = $1 FOR UPDATE")
                .bind(ticket_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(TicketWriteError::NotFound)?;

        let status = TicketStatus::from(status);
        if !status.accepts_messages() {
            return Err(TicketWriteError::Closed);
        }

        let message = insert_message(&mut *tx, ticket_id, author_id, author_role, body).await?;

        let next_status = if is_staff_reply && status == TicketStatus::Open {
            TicketStatus::InProgress
        } else {
            status
        };
        sqlx::query("UPDATE tickets SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(ticket_id)
            .bind(TicketStatusDb::from(next_status))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(message)
    }

    pub async fn update_status(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TicketEntity>(&format!(
            r#"
            UPDATE tickets
            SET status = $2,
                closed_at = CASE WHEN $2 = 'closed'::ticket_status THEN COALESCE(closed_at, NOW()) ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(ticket_id)
        .bind(TicketStatusDb::from(status))
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }
}

async fn insert_message(
    conn: &mut PgConnection,
    ticket_id: Uuid,
    author_id: Uuid,
    author_role: UserRole,
    body: &str,
) -> Result<TicketMessage, sqlx::Error> {
    let entity = sqlx::query_as::<_, TicketMessageEntity>(&format!(
        r#"
        INSERT INTO ticket_messages (ticket_id, author_id, author_role, body)
        VALUES ($1, $2, $3, $4)
        RETURNING {MESSAGE_COLUMNS}
        "#
    ))
    .bind(ticket_id)
    .bind(author_id)
    .bind(UserRoleDb::from(author_role))
    .bind(body.trim())
    .fetch_one(conn)
    .await?;
    Ok(entity.into())
}
