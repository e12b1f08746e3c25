//! Payout bank record, one per organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDetails {
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

/// Full replacement of an organization's bank record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertBankDetailsRequest {
    #[validate(length(min = 1, max = 150, message = "Account holder is required"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub account_holder: String,
    #[validate(length(min = 1, max = 150, message = "Bank name is required"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub bank_name: String,
    #[validate(custom(function = "shared::validation::validate_account_number"))]
    pub account_number: String,
    #[validate(length(min = 1, max = 34, message = "Routing code is required"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub routing_code: String,
    #[validate(custom(function = "shared::validation::validate_iban"))]
    pub iban: Option<String>,
    #[validate(length(max = 150, message = "Branch must be at most 150 characters"))]
    pub branch: Option<String>,
}

impl UpsertBankDetailsRequest {
    /// Account number with spaces removed, as stored.
    pub fn normalized_account_number(&self) -> String {
        self.account_number.chars().filter(|c| !c.is_whitespace()).collect()
    }
}
