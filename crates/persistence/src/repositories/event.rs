//! Event repository.

use domain::models::event::{CreateEventRequest, ListEventsQuery, UpdateEventRequest};
use domain::models::Event;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::event::EventEntity;
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str = "id, organization_id, title, description, location, starts_at, ends_at, capacity, is_published, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        organization_id: Uuid,
        created_by: Uuid,
        request: &CreateEventRequest,
    ) -> Result<Event, sqlx::Error> {
        let timer = QueryTimer::new("event", "create_event");
        let entity = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (organization_id, title, description, location, starts_at, ends_at, capacity, is_published, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(request.title.trim())
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.capacity)
        .bind(request.is_published.unwrap_or(false))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    pub async fn find(
        &self,
        organization_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        let entity = sqlx::query_as::<_, EventEntity>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organization_id = $1 AND id = $2"
        ))
        .bind(organization_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    /// List events overlapping the optional `[from, to]` window.
    pub async fn list(
        &self,
        organization_id: Uuid,
        query: &ListEventsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Event>, i64), sqlx::Error> {
        let timer = QueryTimer::new("event", "list_events");
        let filter = r#"
            WHERE organization_id = $1
              AND ($2::timestamptz IS NULL OR ends_at >= $2)
              AND ($3::timestamptz IS NULL OR starts_at <= $3)
              AND ($4::boolean IS NULL OR is_published = $4)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM events {filter}"))
            .bind(organization_id)
            .bind(query.from)
            .bind(query.to)
            .bind(query.is_published)
            .fetch_one(&self.pool)
            .await?;

        let entities = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            {filter}
            ORDER BY starts_at, id
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(organization_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.is_published)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    pub async fn update(
        &self,
        organization_id: Uuid,
        event_id: Uuid,
        request: &UpdateEventRequest,
    ) -> Result<Option<Event>, sqlx::Error> {
        let timer = QueryTimer::new("event", "update_event");
        let entity = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            UPDATE events
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                capacity = COALESCE($8, capacity),
                is_published = COALESCE($9, is_published),
                updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(event_id)
        .bind(request.title.as_deref().map(str::trim))
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.capacity)
        .bind(request.is_published)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    pub async fn delete(&self, organization_id: Uuid, event_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
