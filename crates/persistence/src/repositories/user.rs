//! User and session repository.

use chrono::{DateTime, Utc};
use domain::models::user::{ListUsersQuery, UpdateProfileRequest};
use domain::models::{User, UserRole};
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::user::{UserEntity, UserRoleDb, UserSessionEntity};
use crate::metrics::QueryTimer;
use crate::repositories::organization::escape_like;

pub(crate) const USER_COLUMNS: &str = "id, email, password_hash, display_name, phone, avatar_url, role, organization_id, is_active, last_login_at, created_at, updated_at";

const SESSION_COLUMNS: &str =
    "id, user_id, refresh_token_hash, expires_at, revoked_at, created_at, last_used_at";

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user row (including password hash) by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user", "find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user", "find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, user: NewUser<'_>) -> Result<User, sqlx::Error> {
        let timer = QueryTimer::new("user", "create_user");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, password_hash, display_name, phone, role, organization_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email.trim().to_lowercase())
        .bind(user.password_hash)
        .bind(user.display_name.trim())
        .bind(user.phone)
        .bind(UserRoleDb::from(user.role))
        .bind(user.organization_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    pub async fn list(
        &self,
        query: &ListUsersQuery,
        page: PageRequest,
    ) -> Result<(Vec<User>, i64), sqlx::Error> {
        let timer = QueryTimer::new("user", "list_users");
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));
        let role = query.role.map(UserRoleDb::from);

        let filter = r#"
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR organization_id = $2)
              AND ($3::text IS NULL OR email ILIKE $3 OR display_name ILIKE $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {filter}"))
            .bind(role)
            .bind(query.organization_id)
            .bind(&search)
            .fetch_one(&self.pool)
            .await?;

        let entities = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            {filter}
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(role)
        .bind(query.organization_id)
        .bind(&search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    pub async fn update_role(
        &self,
        id: Uuid,
        role: UserRole,
        organization_id: Option<Uuid>,
    ) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("user", "update_user_role");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET role = $2, organization_id = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(UserRoleDb::from(role))
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    /// Enable or disable an account. Disabling also revokes its sessions.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("user", "set_user_active");
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&mut *tx)
        .await?;

        if entity.is_some() && !is_active {
            sqlx::query(
                "UPDATE user_sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(entity.map(Into::into))
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("user", "update_user_profile");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET
                display_name = COALESCE($2, display_name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.display_name.as_deref().map(str::trim))
        .bind(&request.phone)
        .bind(&request.avatar_url)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    /// Replace the password hash and revoke every session of the user.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("user", "update_user_password");
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE user_sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    pub async fn update_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_session(
        &self,
        user_id: Uuid,
        refresh_token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UserSessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("user", "create_session");
        let result = sqlx::query_as::<_, UserSessionEntity>(&format!(
            r#"
            INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(refresh_token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_session_by_hash(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<UserSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user", "find_session_by_hash");
        let result = sqlx::query_as::<_, UserSessionEntity>(&format!(
            "SELECT {SESSION_COLUMNS} FROM user_sessions WHERE refresh_token_hash = $1"
        ))
        .bind(refresh_token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Revoke `old_session_id` and insert its replacement atomically.
    ///
    /// Returns `None` when the old session was already revoked, which means
    /// the refresh token was replayed.
    pub async fn rotate_session(
        &self,
        old_session_id: Uuid,
        user_id: Uuid,
        new_refresh_token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<UserSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user", "rotate_session");
        let mut tx = self.pool.begin().await?;

        let revoked = sqlx::query(
            r#"
            UPDATE user_sessions
            SET revoked_at = NOW(), last_used_at = NOW()
            WHERE id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(old_session_id)
        .execute(&mut *tx)
        .await?;

        if revoked.rows_affected() == 0 {
            tracing::warn!(session_id = %old_session_id, user_id = %user_id, "Refresh token reuse on a revoked session");
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        let session = sqlx::query_as::<_, UserSessionEntity>(&format!(
            r#"
            INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(new_refresh_token_hash)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(session))
    }

    pub async fn revoke_session_by_hash(&self, refresh_token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET revoked_at = NOW()
            WHERE refresh_token_hash = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(refresh_token_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete sessions that expired or were revoked before `cutoff`.
    pub async fn delete_stale_sessions(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("user", "delete_stale_sessions");
        let result = sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE expires_at < $1 OR (revoked_at IS NOT NULL AND revoked_at < $1)
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Whether any super-admin account exists.
    pub async fn super_admin_exists(&self) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'super_admin')",
        )
        .fetch_one(&self.pool)
        .await
    }
}
