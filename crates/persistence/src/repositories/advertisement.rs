//! Advertisement repository.

use chrono::{DateTime, Utc};
use domain::models::advertisement::{
    CreateAdvertisementRequest, ListAdvertisementsQuery, UpdateAdvertisementRequest,
};
use domain::models::{AdPlacement, Advertisement};
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::advertisement::{AdPlacementDb, AdvertisementEntity};
use crate::metrics::QueryTimer;

const AD_COLUMNS: &str = "id, title, body, image_url, link_url, placement, starts_at, ends_at, organization_id, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct AdvertisementRepository {
    pool: PgPool,
}

impl AdvertisementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateAdvertisementRequest,
    ) -> Result<Advertisement, sqlx::Error> {
        let timer = QueryTimer::new("advertisement", "create_advertisement");
        let entity = sqlx::query_as::<_, AdvertisementEntity>(&format!(
            r#"
            INSERT INTO advertisements (title, body, image_url, link_url, placement, starts_at, ends_at, organization_id, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {AD_COLUMNS}
            "#
        ))
        .bind(request.title.trim())
        .bind(&request.body)
        .bind(&request.image_url)
        .bind(&request.link_url)
        .bind(AdPlacementDb::from(request.placement))
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.organization_id)
        .bind(request.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    pub async fn find(&self, ad_id: Uuid) -> Result<Option<Advertisement>, sqlx::Error> {
        let entity = sqlx::query_as::<_, AdvertisementEntity>(&format!(
            "SELECT {AD_COLUMNS} FROM advertisements WHERE id = $1"
        ))
        .bind(ad_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn list(
        &self,
        query: &ListAdvertisementsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Advertisement>, i64), sqlx::Error> {
        let placement = query.placement.map(AdPlacementDb::from);
        let filter = r#"
            WHERE ($1::ad_placement IS NULL OR placement = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM advertisements {filter}"))
                .bind(placement)
                .bind(query.is_active)
                .fetch_one(&self.pool)
                .await?;

        let entities = sqlx::query_as::<_, AdvertisementEntity>(&format!(
            r#"
            SELECT {AD_COLUMNS}
            FROM advertisements
            {filter}
            ORDER BY starts_at DESC, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(placement)
        .bind(query.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Active ads whose half-open window contains `now`.
    pub async fn live(
        &self,
        placement: Option<AdPlacement>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Advertisement>, sqlx::Error> {
        let timer = QueryTimer::new("advertisement", "live_advertisements");
        let entities = sqlx::query_as::<_, AdvertisementEntity>(&format!(
            r#"
            SELECT {AD_COLUMNS}
            FROM advertisements
            WHERE is_active = true
              AND starts_at <= $1 AND ends_at > $1
              AND ($2::ad_placement IS NULL OR placement = $2)
            ORDER BY starts_at DESC, id
            "#
        ))
        .bind(now)
        .bind(placement.map(AdPlacementDb::from))
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(entities?.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        ad_id: Uuid,
        request: &UpdateAdvertisementRequest,
    ) -> Result<Option<Advertisement>, sqlx::Error> {
        let entity = sqlx::query_as::<_, AdvertisementEntity>(&format!(
            r#"
            UPDATE advertisements
            SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                image_url = COALESCE($4, image_url),
                link_url = COALESCE($5, link_url),
                placement = COALESCE($6, placement),
                starts_at = COALESCE($7, starts_at),
                ends_at = COALESCE($8, ends_at),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {AD_COLUMNS}
            "#
        ))
        .bind(ad_id)
        .bind(request.title.as_deref().map(str::trim))
        .bind(&request.body)
        .bind(&request.image_url)
        .bind(&request.link_url)
        .bind(request.placement.map(AdPlacementDb::from))
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn delete(&self, ad_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
            .bind(ad_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
