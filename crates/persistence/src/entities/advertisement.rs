//! Advertisement and bank details entities.

use chrono::{DateTime, Utc};
use domain::models::AdPlacement;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ad_placement", rename_all = "snake_case")]
pub enum AdPlacementDb {
    HomeBanner,
    DashboardBanner,
    Sidebar,
    Popup,
}

impl From<AdPlacementDb> for AdPlacement {
    fn from(db: AdPlacementDb) -> Self {
        match db {
            AdPlacementDb::HomeBanner => Self::HomeBanner,
            AdPlacementDb::DashboardBanner => Self::DashboardBanner,
            AdPlacementDb::Sidebar => Self::Sidebar,
            AdPlacementDb::Popup => Self::Popup,
        }
    }
}

impl From<AdPlacement> for AdPlacementDb {
    fn from(domain: AdPlacement) -> Self {
        match domain {
            AdPlacement::HomeBanner => Self::HomeBanner,
            AdPlacement::DashboardBanner => Self::DashboardBanner,
            AdPlacement::Sidebar => Self::Sidebar,
            AdPlacement::Popup => Self::Popup,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AdvertisementEntity {
    pub id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub placement: AdPlacementDb,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdvertisementEntity> for domain::models::Advertisement {
    fn from(entity: AdvertisementEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            body: entity.body,
            image_url: entity.image_url,
            link_url: entity.link_url,
            placement: entity.placement.into(),
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            organization_id: entity.organization_id,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct BankDetailsEntity {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub account_holder: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_code: String,
    pub iban: Option<String>,
    pub branch: Option<String>,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BankDetailsEntity> for domain::models::BankDetails {
    fn from(entity: BankDetailsEntity) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            account_holder: entity.account_holder,
            bank_name: entity.bank_name,
            account_number: entity.account_number,
            routing_code: entity.routing_code,
            iban: entity.iban,
            branch: entity.branch,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
