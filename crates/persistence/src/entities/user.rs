//! User and session entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::UserRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRoleDb {
    SuperAdmin,
    ArenaAdmin,
    Sales,
    Employee,
    EducationStaff,
    Coach,
    Customer,
}

impl From<UserRoleDb> for UserRole {
    fn from(db: UserRoleDb) -> Self {
        match db {
            UserRoleDb::SuperAdmin => Self::SuperAdmin,
            UserRoleDb::ArenaAdmin => Self::ArenaAdmin,
            UserRoleDb::Sales => Self::Sales,
            UserRoleDb::Employee => Self::Employee,
            UserRoleDb::EducationStaff => Self::EducationStaff,
            UserRoleDb::Coach => Self::Coach,
            UserRoleDb::Customer => Self::Customer,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(domain: UserRole) -> Self {
        match domain {
            UserRole::SuperAdmin => Self::SuperAdmin,
            UserRole::ArenaAdmin => Self::ArenaAdmin,
            UserRole::Sales => Self::Sales,
            UserRole::Employee => Self::Employee,
            UserRole::EducationStaff => Self::EducationStaff,
            UserRole::Coach => Self::Coach,
            UserRole::Customer => Self::Customer,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRoleDb,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            phone: entity.phone,
            avatar_url: entity.avatar_url,
            role: entity.role.into(),
            organization_id: entity.organization_id,
            is_active: entity.is_active,
            last_login_at: entity.last_login_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the user_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSessionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl UserSessionEntity {
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
