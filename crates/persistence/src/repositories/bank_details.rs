//! Bank details repository. One row per organization.

use domain::models::bank_details::UpsertBankDetailsRequest;
use domain::models::BankDetails;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::advertisement::BankDetailsEntity;
use crate::metrics::QueryTimer;

const BANK_COLUMNS: &str = "id, organization_id, account_holder, bank_name, account_number, routing_code, iban, branch, updated_by, created_at, updated_at";

#[derive(Clone)]
pub struct BankDetailsRepository {
    pool: PgPool,
}

impl BankDetailsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, organization_id: Uuid) -> Result<Option<BankDetails>, sqlx::Error> {
        let entity = sqlx::query_as::<_, BankDetailsEntity>(&format!(
            "SELECT {BANK_COLUMNS} FROM bank_details WHERE organization_id = $1"
        ))
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entity.map(Into::into))
    }

    pub async fn upsert(
        &self,
        organization_id: Uuid,
        updated_by: Uuid,
        request: &UpsertBankDetailsRequest,
    ) -> Result<BankDetails, sqlx::Error> {
        let timer = QueryTimer::new("bank_details", "upsert_bank_details");
        let entity = sqlx::query_as::<_, BankDetailsEntity>(&format!(
            r#"
            INSERT INTO bank_details (organization_id, account_holder, bank_name, account_number, routing_code, iban, branch, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (organization_id) DO UPDATE SET
                account_holder = EXCLUDED.account_holder,
                bank_name = EXCLUDED.bank_name,
                account_number = EXCLUDED.account_number,
                routing_code = EXCLUDED.routing_code,
                iban = EXCLUDED.iban,
                branch = EXCLUDED.branch,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING {BANK_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(request.account_holder.trim())
        .bind(request.bank_name.trim())
        .bind(request.normalized_account_number())
        .bind(request.routing_code.trim())
        .bind(request.iban.as_deref().map(|iban| iban.replace(' ', "").to_uppercase()))
        .bind(request.branch.as_deref().map(str::trim))
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }
}
