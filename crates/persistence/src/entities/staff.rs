//! Staff member entity: users joined with staff_members.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserRoleDb;

#[derive(Debug, Clone, FromRow)]
pub struct StaffMemberEntity {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: UserRoleDb,
    pub position: Option<String>,
    pub specialization: Option<String>,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<StaffMemberEntity> for domain::models::StaffMember {
    fn from(entity: StaffMemberEntity) -> Self {
        Self {
            user_id: entity.user_id,
            organization_id: entity.organization_id,
            email: entity.email,
            display_name: entity.display_name,
            phone: entity.phone,
            role: entity.role.into(),
            position: entity.position,
            specialization: entity.specialization,
            is_active: entity.is_active,
            joined_at: entity.joined_at,
        }
    }
}
