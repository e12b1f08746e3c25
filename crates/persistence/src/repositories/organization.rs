//! Organization repository for database operations.

use domain::models::organization::{
    CreateOrganizationRequest, ListOrganizationsQuery, UpdateOrganizationRequest,
};
use domain::models::Organization;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::organization::{OrganizationEntity, OrganizationTypeDb};
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, name, organization_type, address, logo_url, contact_email, contact_phone, is_active, created_at, updated_at";

/// Repository for organization database operations.
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new organization.
    pub async fn create(
        &self,
        request: &CreateOrganizationRequest,
    ) -> Result<Organization, sqlx::Error> {
        let timer = QueryTimer::new("organization", "create_organization");
        let entity = sqlx::query_as::<_, OrganizationEntity>(&format!(
            r#"
            INSERT INTO organizations (name, organization_type, address, logo_url, contact_email, contact_phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.name.trim())
        .bind(OrganizationTypeDb::from(request.organization_type))
        .bind(&request.address)
        .bind(&request.logo_url)
        .bind(&request.contact_email)
        .bind(&request.contact_phone)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(entity?.into())
    }

    /// Find organization by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, sqlx::Error> {
        let timer = QueryTimer::new("organization", "find_organization_by_id");
        let entity = sqlx::query_as::<_, OrganizationEntity>(&format!(
            "SELECT {COLUMNS} FROM organizations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    /// Update organization. `None` fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateOrganizationRequest,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let timer = QueryTimer::new("organization", "update_organization");
        let entity = sqlx::query_as::<_, OrganizationEntity>(&format!(
            r#"
            UPDATE organizations
            SET
                name = COALESCE($2, name),
                organization_type = COALESCE($3, organization_type),
                address = COALESCE($4, address),
                logo_url = COALESCE($5, logo_url),
                contact_email = COALESCE($6, contact_email),
                contact_phone = COALESCE($7, contact_phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.organization_type.map(OrganizationTypeDb::from))
        .bind(&request.address)
        .bind(&request.logo_url)
        .bind(&request.contact_email)
        .bind(&request.contact_phone)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    /// Activate or deactivate an organization.
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let timer = QueryTimer::new("organization", "set_organization_active");
        let entity = sqlx::query_as::<_, OrganizationEntity>(&format!(
            r#"
            UPDATE organizations
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(entity?.map(Into::into))
    }

    /// Hard delete. Courts, bookings, staff links and every other row
    /// owned by the organization go with it through `ON DELETE CASCADE`.
    ///
    /// Member accounts are kept so that their bookings and tickets at other
    /// organizations survive: they are detached, demoted to customer,
    /// deactivated and their sessions revoked, all in one transaction.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("organization", "delete_organization");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE user_sessions SET revoked_at = NOW()
            WHERE revoked_at IS NULL
              AND user_id IN (SELECT id FROM users WHERE organization_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET organization_id = NULL, role = 'customer', is_active = FALSE, updated_at = NOW()
            WHERE organization_id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }

    /// List organizations with pagination and filtering.
    pub async fn list(
        &self,
        query: &ListOrganizationsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Organization>, i64), sqlx::Error> {
        let timer = QueryTimer::new("organization", "list_organizations");
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));
        let organization_type = query.organization_type.map(OrganizationTypeDb::from);

        let filter = r#"
            WHERE ($1::organization_type IS NULL OR organization_type = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR name ILIKE $3)
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM organizations {filter}"))
                .bind(organization_type)
                .bind(query.is_active)
                .bind(&search)
                .fetch_one(&self.pool)
                .await?;

        let entities = sqlx::query_as::<_, OrganizationEntity>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM organizations
            {filter}
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(organization_type)
        .bind(query.is_active)
        .bind(&search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }
}

/// Escapes `%`, `_` and `\` for use inside an ILIKE pattern.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("arena"), "arena");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
