//! Staff repository. Account and staff link are written together.

use domain::models::staff::{ListStaffQuery, UpdateStaffRequest};
use domain::models::{StaffMember, UserRole};
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::staff::StaffMemberEntity;
use crate::entities::user::UserRoleDb;
use crate::metrics::QueryTimer;

const STAFF_SELECT: &str = r#"
    SELECT s.user_id, s.organization_id, u.email, u.display_name, u.phone, u.role,
           s.position, s.specialization, u.is_active, s.joined_at
    FROM staff_members s
    JOIN users u ON u.id = s.user_id
"#;

/// Fields for a new staff account.
#[derive(Debug, Clone)]
pub struct NewStaffMember<'a> {
    pub organization_id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: UserRole,
    pub position: Option<&'a str>,
    pub specialization: Option<&'a str>,
}

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the user account and its staff link in one transaction.
    pub async fn create(&self, staff: NewStaffMember<'_>) -> Result<StaffMember, sqlx::Error> {
        let timer = QueryTimer::new("staff", "create_staff_member");
        let mut tx = self.pool.begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, display_name, phone, role, organization_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(staff.email.trim().to_lowercase())
        .bind(staff.password_hash)
        .bind(staff.display_name.trim())
        .bind(staff.phone)
        .bind(UserRoleDb::from(staff.role))
        .bind(staff.organization_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO staff_members (user_id, organization_id, position, specialization)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(staff.organization_id)
        .bind(staff.position)
        .bind(staff.specialization)
        .execute(&mut *tx)
        .await?;

        let entity = sqlx::query_as::<_, StaffMemberEntity>(&format!(
            "{STAFF_SELECT} WHERE s.user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entity.into())
    }

    pub async fn find(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<StaffMember>, sqlx::Error> {
        let entity = sqlx::query_as::<_, StaffMemberEntity>(&format!(
            "{STAFF_SELECT} WHERE s.organization_id = $1 AND s.user_id = $2"
        ))
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        query: &ListStaffQuery,
        page: PageRequest,
    ) -> Result<(Vec<StaffMember>, i64), sqlx::Error> {
        let timer = QueryTimer::new("staff", "list_staff_members");
        let role = query.role.map(UserRoleDb::from);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM staff_members s
            JOIN users u ON u.id = s.user_id
            WHERE s.organization_id = $1
              AND ($2::user_role IS NULL OR u.role = $2)
            "#,
        )
        .bind(organization_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, StaffMemberEntity>(&format!(
            r#"
            {STAFF_SELECT}
            WHERE s.organization_id = $1
              AND ($2::user_role IS NULL OR u.role = $2)
            ORDER BY u.display_name, s.user_id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(organization_id)
        .bind(role)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Update profile and position fields of a staff member.
    pub async fn update(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        request: &UpdateStaffRequest,
    ) -> Result<Option<StaffMember>, sqlx::Error> {
        let timer = QueryTimer::new("staff", "update_staff_member");
        let mut tx = self.pool.begin().await?;

        let linked = sqlx::query(
            r#"
            UPDATE staff_members
            SET position = COALESCE($3, position),
                specialization = COALESCE($4, specialization)
            WHERE organization_id = $1 AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .bind(&request.position)
        .bind(&request.specialization)
        .execute(&mut *tx)
        .await?;

        if linked.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(request.display_name.as_deref().map(str::trim))
        .bind(&request.phone)
        .execute(&mut *tx)
        .await?;

        let entity = sqlx::query_as::<_, StaffMemberEntity>(&format!(
            "{STAFF_SELECT} WHERE s.user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity.into()))
    }

    /// Remove the staff link, deactivate the account and revoke its sessions
    /// in one transaction.
    pub async fn remove(&self, organization_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("staff", "remove_staff_member");
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM staff_members WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(organization_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if removed.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        sqlx::query("UPDATE users SET is_active = false, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE user_sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(true)
    }
}
