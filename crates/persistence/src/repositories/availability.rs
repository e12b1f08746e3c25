//! Availability repository: one-off blocks and recurring weekly rules.

use chrono::NaiveDate;
use domain::models::availability::{AvailabilityBlockInput, CreateRecurringUnavailabilityRequest};
use domain::models::{AvailabilityBlock, RecurringUnavailability};
use domain::services::day_of_week;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::court::{AvailabilityBlockEntity, RecurringUnavailabilityEntity};
use crate::metrics::QueryTimer;

const BLOCK_COLUMNS: &str = "id, court_id, block_date, start_time, end_time, reason, created_at";
const RULE_COLUMNS: &str = "id, court_id, day_of_week, start_time, end_time, reason, created_at";

#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace every one-off block of a court. An empty slice clears them.
    pub async fn replace_blocks(
        &self,
        court_id: Uuid,
        blocks: &[AvailabilityBlockInput],
    ) -> Result<Vec<AvailabilityBlock>, sqlx::Error> {
        let timer = QueryTimer::new("availability", "replace_availability_blocks");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM availability_blocks WHERE court_id = $1")
            .bind(court_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted: Vec<AvailabilityBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            let entity = sqlx::query_as::<_, AvailabilityBlockEntity>(&format!(
                r#"
                INSERT INTO availability_blocks (court_id, block_date, start_time, end_time, reason)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {BLOCK_COLUMNS}
                "#
            ))
            .bind(court_id)
            .bind(block.date)
            .bind(block.start_time)
            .bind(block.end_time)
            .bind(&block.reason)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(entity.into());
        }

        tx.commit().await?;
        timer.record();

        inserted.sort_by_key(|b| (b.block_date, b.start_time));
        Ok(inserted)
    }

    /// List blocks, optionally bounded by an inclusive date range.
    pub async fn list_blocks(
        &self,
        court_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityBlock>, sqlx::Error> {
        let timer = QueryTimer::new("availability", "list_availability_blocks");
        let entities = sqlx::query_as::<_, AvailabilityBlockEntity>(&format!(
            r#"
            SELECT {BLOCK_COLUMNS}
            FROM availability_blocks
            WHERE court_id = $1
              AND ($2::date IS NULL OR block_date >= $2)
              AND ($3::date IS NULL OR block_date <= $3)
            ORDER BY block_date, start_time NULLS FIRST
            "#
        ))
        .bind(court_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(entities?.into_iter().map(Into::into).collect())
    }

    pub async fn create_rule(
        &self,
        court_id: Uuid,
        request: &CreateRecurringUnavailabilityRequest,
    ) -> Result<RecurringUnavailability, sqlx::Error> {
        let timer = QueryTimer::new("availability", "create_recurring_unavailability");
        let entity = sqlx::query_as::<_, RecurringUnavailabilityEntity>(&format!(
            r#"
            INSERT INTO recurring_unavailability (court_id, day_of_week, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(court_id)
        .bind(request.day_of_week)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(&request.reason)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    pub async fn list_rules(&self, court_id: Uuid) -> Result<Vec<RecurringUnavailability>, sqlx::Error> {
        let entities = sqlx::query_as::<_, RecurringUnavailabilityEntity>(&format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM recurring_unavailability
            WHERE court_id = $1
            ORDER BY day_of_week, start_time
            "#
        ))
        .bind(court_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn delete_rule(&self, court_id: Uuid, rule_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recurring_unavailability WHERE court_id = $1 AND id = $2")
            .bind(court_id)
            .bind(rule_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Blocks and weekday rules that apply to one date.
    pub async fn for_date(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<(Vec<AvailabilityBlock>, Vec<RecurringUnavailability>), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let blocks = blocks_on(&mut *conn, court_id, date).await?;
        let rules = rules_on(&mut *conn, court_id, date).await?;
        Ok((blocks, rules))
    }
}

pub(crate) async fn blocks_on(
    conn: &mut PgConnection,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<AvailabilityBlock>, sqlx::Error> {
    let entities = sqlx::query_as::<_, AvailabilityBlockEntity>(&format!(
        "SELECT {BLOCK_COLUMNS} FROM availability_blocks WHERE court_id = $1 AND block_date = $2"
    ))
    .bind(court_id)
    .bind(date)
    .fetch_all(conn)
    .await?;
    Ok(entities.into_iter().map(Into::into).collect())
}

pub(crate) async fn rules_on(
    conn: &mut PgConnection,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<RecurringUnavailability>, sqlx::Error> {
    let entities = sqlx::query_as::<_, RecurringUnavailabilityEntity>(&format!(
        "SELECT {RULE_COLUMNS} FROM recurring_unavailability WHERE court_id = $1 AND day_of_week = $2"
    ))
    .bind(court_id)
    .bind(day_of_week(date))
    .fetch_all(conn)
    .await?;
    Ok(entities.into_iter().map(Into::into).collect())
}
