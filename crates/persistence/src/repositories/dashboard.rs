//! Dashboard statistics repository.
//!
//! Each statistic is one query; the aggregates run them concurrently.

use chrono::{Datelike, NaiveDate, Utc};
use domain::models::dashboard::{AdminStats, BookingBreakdown, OrganizationDashboard};
use domain::models::BookingStatus;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn organization_dashboard(
        &self,
        organization_id: Uuid,
    ) -> Result<OrganizationDashboard, sqlx::Error> {
        let timer = QueryTimer::new("dashboard", "organization_dashboard");
        let today = Utc::now().date_naive();

        let result = tokio::try_join!(
            self.count_courts(organization_id),
            self.count_active_staff(organization_id),
            self.booking_breakdown(organization_id),
            self.count_upcoming_events(organization_id),
            self.count_open_tickets(Some(organization_id)),
            self.revenue_since(organization_id, first_of_month(today)),
        );
        timer.record();
        let (courts, active_staff, bookings, upcoming_events, open_tickets, revenue) = result?;

        Ok(OrganizationDashboard {
            organization_id,
            courts,
            active_staff,
            bookings,
            upcoming_events,
            open_tickets,
            revenue_this_month_cents: revenue,
            generated_at: Utc::now(),
        })
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, sqlx::Error> {
        let timer = QueryTimer::new("dashboard", "admin_stats");
        let result = tokio::try_join!(
            self.organizations_by_type(),
            self.users_by_role(),
            self.count_bookings(),
            self.count_open_tickets(None),
        );
        timer.record();
        let (by_type, by_role, bookings_total, open_tickets) = result?;

        Ok(AdminStats::new(by_type, by_role, bookings_total, open_tickets))
    }

    async fn count_courts(&self, organization_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courts WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn count_active_staff(&self, organization_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM staff_members s
            JOIN users u ON u.id = s.user_id
            WHERE s.organization_id = $1 AND u.is_active = true
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn booking_breakdown(&self, organization_id: Uuid) -> Result<BookingBreakdown, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM bookings WHERE organization_id = $1 GROUP BY status",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        let counts: Vec<(i16, i64)> = rows
            .iter()
            .map(|row| (row.get::<i16, _>("status"), row.get::<i64, _>("count")))
            .collect();
        Ok(BookingBreakdown::from_counts(&counts))
    }

    async fn count_upcoming_events(&self, organization_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM events WHERE organization_id = $1 AND starts_at > NOW()",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_open_tickets(&self, organization_id: Option<Uuid>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tickets
            WHERE status <> 'closed'
              AND ($1::uuid IS NULL OR organization_id = $1)
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn revenue_since(
        &self,
        organization_id: Uuid,
        since: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_price_cents), 0)::BIGINT
            FROM bookings
            WHERE organization_id = $1 AND status = $2 AND booking_date >= $3
            "#,
        )
        .bind(organization_id)
        .bind(BookingStatus::Confirmed.code())
        .bind(since)
        .fetch_one(&self.pool)
        .await
    }

    async fn organizations_by_type(&self) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT organization_type::TEXT AS kind, COUNT(*) AS count FROM organizations GROUP BY organization_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get::<String, _>("kind"), row.get::<i64, _>("count")))
            .collect())
    }

    async fn users_by_role(&self) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let rows = sqlx::query("SELECT role::TEXT AS role, COUNT(*) AS count FROM users GROUP BY role")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get::<String, _>("role"), row.get::<i64, _>("count")))
            .collect())
    }

    async fn count_bookings(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
