//! Placement-targeted advertisements with a scheduling window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdPlacement {
    HomeBanner,
    DashboardBanner,
    Sidebar,
    Popup,
}

impl AdPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdPlacement::HomeBanner => "home_banner",
            AdPlacement::DashboardBanner => "dashboard_banner",
            AdPlacement::Sidebar => "sidebar",
            AdPlacement::Popup => "popup",
        }
    }
}

impl FromStr for AdPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home_banner" => Ok(AdPlacement::HomeBanner),
            "dashboard_banner" => Ok(AdPlacement::DashboardBanner),
            "sidebar" => Ok(AdPlacement::Sidebar),
            "popup" => Ok(AdPlacement::Popup),
            _ => Err(format!("Invalid placement: {}", s)),
        }
    }
}

impl fmt::Display for AdPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub placement: AdPlacement,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advertisement {
    /// Active and inside its `[starts_at, ends_at)` window at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.starts_at <= now && now < self.ends_at
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_ad_window"))]
pub struct CreateAdvertisementRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Body must be at most 2000 characters"))]
    pub body: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "Link URL must be a valid URL"))]
    pub link_url: Option<String>,
    pub placement: AdPlacement,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub organization_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

fn validate_create_ad_window(req: &CreateAdvertisementRequest) -> Result<(), ValidationError> {
    check_ad_window(req.starts_at, req.ends_at)
}

pub fn check_ad_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if starts_at < ends_at {
        Ok(())
    } else {
        let mut err = ValidationError::new("ad_window");
        err.message = Some("starts_at must be before ends_at".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateAdvertisementRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "Body must be at most 2000 characters"))]
    pub body: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "Link URL must be a valid URL"))]
    pub link_url: Option<String>,
    pub placement: Option<AdPlacement>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl UpdateAdvertisementRequest {
    pub fn effective_window(&self, ad: &Advertisement) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.starts_at.unwrap_or(ad.starts_at),
            self.ends_at.unwrap_or(ad.ends_at),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListAdvertisementsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub placement: Option<AdPlacement>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PublicAdvertisementsQuery {
    pub placement: Option<AdPlacement>,
}
