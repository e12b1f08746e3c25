//! Court booking repository.
//!
//! Booking creation locks the court row, re-reads the court calendar for the
//! date and inserts only when the slot is free, all inside one transaction.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::booking::{ListBookingsQuery, MyBookingsQuery};
use domain::models::{Booking, BookingStatus};
use domain::services::{court_booking_price, AvailabilityError, CourtCalendar};
use shared::pagination::PageRequest;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::booking::BookingEntity;
use crate::entities::court::CourtEntity;
use crate::metrics::QueryTimer;
use crate::repositories::availability::{blocks_on, rules_on};
use crate::repositories::court::COURT_COLUMNS;

const BOOKING_COLUMNS: &str = "id, organization_id, court_id, user_id, booking_date, start_time, end_time, status, total_price_cents, notes, created_by, created_at, updated_at";

/// Fields for a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking<'a> {
    pub organization_id: Uuid,
    pub court_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<&'a str>,
    pub created_by: Uuid,
}

#[derive(Debug, Error)]
pub enum BookingWriteError {
    #[error("Court not found")]
    CourtNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error(transparent)]
    Unavailable(#[from] AvailabilityError),

    #[error("Cannot change booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending booking if the slot is free.
    pub async fn create(
        &self,
        booking: NewBooking<'_>,
        max_minutes: i64,
    ) -> Result<Booking, BookingWriteError> {
        let timer = QueryTimer::new("booking", "create_booking");
        let mut tx = self.pool.begin().await?;

        let court = sqlx::query_as::<_, CourtEntity>(&format!(
            "SELECT {COURT_COLUMNS} FROM courts WHERE organization_id = $1 AND id = $2 FOR UPDATE"
        ))
        .bind(booking.organization_id)
        .bind(booking.court_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(domain::models::Court::from)
        .ok_or(BookingWriteError::CourtNotFound)?;

        let blocks = blocks_on(&mut *tx, court.id, booking.booking_date).await?;
        let rules = rules_on(&mut *tx, court.id, booking.booking_date).await?;
        let existing = active_on(&mut *tx, court.id, booking.booking_date).await?;

        CourtCalendar::new(&court, booking.booking_date, &blocks, &rules, &existing).check_slot(
            booking.start_time,
            booking.end_time,
            max_minutes,
        )?;

        let minutes = (booking.end_time - booking.start_time).num_minutes();
        let price = court_booking_price(court.price_per_hour_cents, minutes);

        let entity = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            INSERT INTO bookings (organization_id, court_id, user_id, booking_date, start_time, end_time, status, total_price_cents, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.organization_id)
        .bind(booking.court_id)
        .bind(booking.user_id)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(BookingStatus::Pending.code())
        .bind(price)
        .bind(booking.notes)
        .bind(booking.created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entity.into())
    }

    pub async fn find(
        &self,
        organization_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let entity = sqlx::query_as::<_, BookingEntity>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE organization_id = $1 AND id = $2"
        ))
        .bind(organization_id)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        query: &ListBookingsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Booking>, i64), sqlx::Error> {
        let timer = QueryTimer::new("booking", "list_bookings");
        let status = query.status.map(|s| s.code());

        let filter = r#"
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR court_id = $2)
              AND ($3::smallint IS NULL OR status = $3)
              AND ($4::date IS NULL OR booking_date >= $4)
              AND ($5::date IS NULL OR booking_date <= $5)
              AND ($6::uuid IS NULL OR user_id = $6)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings {filter}"))
            .bind(organization_id)
            .bind(query.court_id)
            .bind(status)
            .bind(query.from)
            .bind(query.to)
            .bind(query.user_id)
            .fetch_one(&self.pool)
            .await?;

        let entities = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            {filter}
            ORDER BY booking_date DESC, start_time DESC, id
            LIMIT $7 OFFSET $8
            "#
        ))
        .bind(organization_id)
        .bind(query.court_id)
        .bind(status)
        .bind(query.from)
        .bind(query.to)
        .bind(query.user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Bookings of one user across all organizations.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        query: &MyBookingsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Booking>, i64), sqlx::Error> {
        let status = query.status.map(|s| s.code());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE user_id = $1 AND ($2::smallint IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE user_id = $1 AND ($2::smallint IS NULL OR status = $2)
            ORDER BY booking_date DESC, start_time DESC, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Non-cancelled bookings of a court on one date.
    pub async fn active_for_date(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        active_on(&mut *conn, court_id, date).await
    }

    /// Apply a status transition under a row lock.
    pub async fn update_status(
        &self,
        organization_id: Uuid,
        booking_id: Uuid,
        next: BookingStatus,
    ) -> Result<Booking, BookingWriteError> {
        let timer = QueryTimer::new("booking", "update_booking_status");
        let mut tx = self.pool.begin().await?;

        let current: i16 = sqlx::query_scalar(
            "SELECT status FROM bookings WHERE organization_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(organization_id)
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingWriteError::BookingNotFound)?;

        let current = crate::entities::booking::status_from_code(current);
        if !current.can_transition_to(next) {
            return Err(BookingWriteError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let entity = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(next.code())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entity.into())
    }

    /// Cancel pending bookings created before `cutoff`.
    pub async fn expire_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("booking", "expire_pending_bookings");
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE status = $2 AND created_at < $3
            "#,
        )
        .bind(BookingStatus::Cancelled.code())
        .bind(BookingStatus::Pending.code())
        .bind(cutoff)
        .execute(&self.pool)
        .await;
        timer.record();
        let expired = result?.rows_affected();
        if expired > 0 {
            tracing::debug!(expired, %cutoff, "Cancelled stale pending bookings");
        }
        Ok(expired)
    }
}

async fn active_on(
    conn: &mut PgConnection,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<Booking>, sqlx::Error> {
    let entities = sqlx::query_as::<_, BookingEntity>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE court_id = $1 AND booking_date = $2 AND status <> $3
        ORDER BY start_time
        "#
    ))
    .bind(court_id)
    .bind(date)
    .bind(BookingStatus::Cancelled.code())
    .fetch_all(conn)
    .await?;
    Ok(entities.into_iter().map(Into::into).collect())
}
