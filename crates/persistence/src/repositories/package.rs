//! Package and package booking repository.

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::package::{
    CreatePackageRequest, ListPackageBookingsQuery, ListPackagesQuery, UpdatePackageRequest,
};
use domain::models::{BookingStatus, Package, PackageBooking};
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::booking::{status_from_code, PackageBookingEntity};
use crate::entities::event::PackageEntity;
use crate::metrics::QueryTimer;
use crate::repositories::booking::BookingWriteError;

const PACKAGE_COLUMNS: &str = "id, organization_id, name, description, price_cents, capacity, duration_nights, is_active, created_at, updated_at";
const PACKAGE_BOOKING_COLUMNS: &str = "id, package_id, organization_id, user_id, check_in, check_out, guests, status, total_price_cents, notes, created_at, updated_at";

/// Fields for a new package booking.
#[derive(Debug, Clone)]
pub struct NewPackageBooking<'a> {
    pub package_id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price_cents: i64,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        organization_id: Uuid,
        request: &CreatePackageRequest,
    ) -> Result<Package, sqlx::Error> {
        let timer = QueryTimer::new("package", "create_package");
        let entity = sqlx::query_as::<_, PackageEntity>(&format!(
            r#"
            INSERT INTO packages (organization_id, name, description, price_cents, capacity, duration_nights, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PACKAGE_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(request.price_cents)
        .bind(request.capacity)
        .bind(request.duration_nights)
        .bind(request.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    pub async fn find(
        &self,
        organization_id: Uuid,
        package_id: Uuid,
    ) -> Result<Option<Package>, sqlx::Error> {
        let entity = sqlx::query_as::<_, PackageEntity>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE organization_id = $1 AND id = $2"
        ))
        .bind(organization_id)
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        query: &ListPackagesQuery,
        page: PageRequest,
    ) -> Result<(Vec<Package>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM packages WHERE organization_id = $1 AND ($2::boolean IS NULL OR is_active = $2)",
        )
        .bind(organization_id)
        .bind(query.is_active)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, PackageEntity>(&format!(
            r#"
            SELECT {PACKAGE_COLUMNS}
            FROM packages
            WHERE organization_id = $1 AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY name, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(organization_id)
        .bind(query.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    pub async fn update(
        &self,
        organization_id: Uuid,
        package_id: Uuid,
        request: &UpdatePackageRequest,
    ) -> Result<Option<Package>, sqlx::Error> {
        let timer = QueryTimer::new("package", "update_package");
        let entity = sqlx::query_as::<_, PackageEntity>(&format!(
            r#"
            UPDATE packages
            SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price_cents = COALESCE($5, price_cents),
                capacity = COALESCE($6, capacity),
                duration_nights = COALESCE($7, duration_nights),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING {PACKAGE_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(package_id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(&request.description)
        .bind(request.price_cents)
        .bind(request.capacity)
        .bind(request.duration_nights)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    pub async fn delete(&self, organization_id: Uuid, package_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM packages WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(package_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_booking(
        &self,
        booking: NewPackageBooking<'_>,
    ) -> Result<PackageBooking, sqlx::Error> {
        let timer = QueryTimer::new("package", "create_package_booking");
        let entity = sqlx::query_as::<_, PackageBookingEntity>(&format!(
            r#"
            INSERT INTO package_bookings (package_id, organization_id, user_id, check_in, check_out, guests, status, total_price_cents, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PACKAGE_BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.package_id)
        .bind(booking.organization_id)
        .bind(booking.user_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.guests)
        .bind(BookingStatus::Pending.code())
        .bind(booking.total_price_cents)
        .bind(booking.notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    pub async fn find_booking(
        &self,
        organization_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Option<PackageBooking>, sqlx::Error> {
        let entity = sqlx::query_as::<_, PackageBookingEntity>(&format!(
            "SELECT {PACKAGE_BOOKING_COLUMNS} FROM package_bookings WHERE organization_id = $1 AND id = $2"
        ))
        .bind(organization_id)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn list_bookings(
        &self,
        package_id: Uuid,
        query: &ListPackageBookingsQuery,
        page: PageRequest,
    ) -> Result<(Vec<PackageBooking>, i64), sqlx::Error> {
        let status = query.status.map(|s| s.code());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM package_bookings WHERE package_id = $1 AND ($2::smallint IS NULL OR status = $2)",
        )
        .bind(package_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, PackageBookingEntity>(&format!(
            r#"
            SELECT {PACKAGE_BOOKING_COLUMNS}
            FROM package_bookings
            WHERE package_id = $1 AND ($2::smallint IS NULL OR status = $2)
            ORDER BY check_in DESC, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(package_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Apply a status transition under a row lock.
    pub async fn update_booking_status(
        &self,
        organization_id: Uuid,
        booking_id: Uuid,
        next: BookingStatus,
    ) -> Result<PackageBooking, BookingWriteError> {
        let timer = QueryTimer::new("package", "update_package_booking_status");
        let mut tx = self.pool.begin().await?;

        let current: i16 = sqlx::query_scalar(
            "SELECT status FROM package_bookings WHERE organization_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(organization_id)
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingWriteError::BookingNotFound)?;

        let current = status_from_code(current);
        if !current.can_transition_to(next) {
            return Err(BookingWriteError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let entity = sqlx::query_as::<_, PackageBookingEntity>(&format!(
            r#"
            UPDATE package_bookings
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PACKAGE_BOOKING_COLUMNS}
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

    /// Cancel pending package bookings created before `cutoff`.
    pub async fn expire_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE package_bookings
            SET status = $1, updated_at = NOW()
            WHERE status = $2 AND created_at < $3
            "#,
        )
        .bind(BookingStatus::Cancelled.code())
        .bind(BookingStatus::Pending.code())
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
