//! Organization entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::OrganizationType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for organization_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "organization_type", rename_all = "snake_case")]
pub enum OrganizationTypeDb {
    Arena,
    LivingSpace,
    Hospitality,
    Education,
}

impl From<OrganizationTypeDb> for OrganizationType {
    fn from(db: OrganizationTypeDb) -> Self {
        match db {
            OrganizationTypeDb::Arena => Self::Arena,
            OrganizationTypeDb::LivingSpace => Self::LivingSpace,
            OrganizationTypeDb::Hospitality => Self::Hospitality,
            OrganizationTypeDb::Education => Self::Education,
        }
    }
}

impl From<OrganizationType> for OrganizationTypeDb {
    fn from(domain: OrganizationType) -> Self {
        match domain {
            OrganizationType::Arena => Self::Arena,
            OrganizationType::LivingSpace => Self::LivingSpace,
            OrganizationType::Hospitality => Self::Hospitality,
            OrganizationType::Education => Self::Education,
        }
    }
}

/// Database row mapping for the organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationEntity {
    pub id: Uuid,
    pub name: String,
    pub organization_type: OrganizationTypeDb,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrganizationEntity> for domain::models::Organization {
    fn from(entity: OrganizationEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            organization_type: entity.organization_type.into(),
            address: entity.address,
            logo_url: entity.logo_url,
            contact_email: entity.contact_email,
            contact_phone: entity.contact_phone,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_type_conversion() {
        for ty in [
            OrganizationType::Arena,
            OrganizationType::LivingSpace,
            OrganizationType::Hospitality,
            OrganizationType::Education,
        ] {
            assert_eq!(OrganizationType::from(OrganizationTypeDb::from(ty)), ty);
        }
    }
}
