//! Court repository.

use domain::models::court::{CreateCourtRequest, ListCourtsQuery, UpdateCourtRequest, DEFAULT_SLOT_MINUTES};
use domain::models::Court;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::court::CourtEntity;
use crate::metrics::QueryTimer;

pub(crate) const COURT_COLUMNS: &str = "id, organization_id, name, sport, description, price_per_hour_cents, opens_at, closes_at, slot_minutes, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct CourtRepository {
    pool: PgPool,
}

impl CourtRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        organization_id: Uuid,
        request: &CreateCourtRequest,
    ) -> Result<Court, sqlx::Error> {
        let timer = QueryTimer::new("court", "create_court");
        let entity = sqlx::query_as::<_, CourtEntity>(&format!(
            r#"
            INSERT INTO courts (organization_id, name, sport, description, price_per_hour_cents, opens_at, closes_at, slot_minutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COURT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(request.name.trim())
        .bind(request.sport.trim())
        .bind(&request.description)
        .bind(request.price_per_hour_cents)
        .bind(request.opens_at)
        .bind(request.closes_at)
        .bind(request.slot_minutes.unwrap_or(DEFAULT_SLOT_MINUTES))
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    /// Find a court scoped to its organization.
    pub async fn find(
        &self,
        organization_id: Uuid,
        court_id: Uuid,
    ) -> Result<Option<Court>, sqlx::Error> {
        let timer = QueryTimer::new("court", "find_court");
        let entity = sqlx::query_as::<_, CourtEntity>(&format!(
            "SELECT {COURT_COLUMNS} FROM courts WHERE organization_id = $1 AND id = $2"
        ))
        .bind(organization_id)
        .bind(court_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        query: &ListCourtsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Court>, i64), sqlx::Error> {
        let timer = QueryTimer::new("court", "list_courts");
        let sport = query.sport.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let filter = r#"
            WHERE organization_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR LOWER(sport) = LOWER($3))
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM courts {filter}"))
            .bind(organization_id)
            .bind(query.is_active)
            .bind(sport)
            .fetch_one(&self.pool)
            .await?;

        let entities = sqlx::query_as::<_, CourtEntity>(&format!(
            r#"
            SELECT {COURT_COLUMNS}
            FROM courts
            {filter}
            ORDER BY name, id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(organization_id)
        .bind(query.is_active)
        .bind(sport)
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
        court_id: Uuid,
        request: &UpdateCourtRequest,
    ) -> Result<Option<Court>, sqlx::Error> {
        let timer = QueryTimer::new("court", "update_court");
        let entity = sqlx::query_as::<_, CourtEntity>(&format!(
            r#"
            UPDATE courts
            SET
                name = COALESCE($3, name),
                sport = COALESCE($4, sport),
                description = COALESCE($5, description),
                price_per_hour_cents = COALESCE($6, price_per_hour_cents),
                opens_at = COALESCE($7, opens_at),
                closes_at = COALESCE($8, closes_at),
                slot_minutes = COALESCE($9, slot_minutes),
                is_active = COALESCE($10, is_active),
                updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING {COURT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(court_id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.sport.as_deref().map(str::trim))
        .bind(&request.description)
        .bind(request.price_per_hour_cents)
        .bind(request.opens_at)
        .bind(request.closes_at)
        .bind(request.slot_minutes)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    pub async fn delete(&self, organization_id: Uuid, court_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("court", "delete_court");
        let result = sqlx::query("DELETE FROM courts WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(court_id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }
}
