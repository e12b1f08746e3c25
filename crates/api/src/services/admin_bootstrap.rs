//! Creates the first super-admin at startup when configured.
//!
//! Idempotent: does nothing once any super-admin exists or the configured
//! email is taken.

use domain::models::UserRole;
use persistence::repositories::{NewUser, UserRepository};
use shared::password::{hash_password, validate_password_policy, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::BootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// Returns whether an account was created.
pub async fn bootstrap_super_admin(
    pool: &PgPool,
    config: &BootstrapConfig,
) -> Result<bool, BootstrapError> {
    let Some((email, password)) = config.credentials() else {
        if config.super_admin_email.is_some() {
            warn!("bootstrap.super_admin_email is set without a password, skipping bootstrap");
        }
        return Ok(false);
    };

    let users = UserRepository::new(pool.clone());
    if users.super_admin_exists().await? {
        info!("Super admin already exists, skipping bootstrap");
        return Ok(false);
    }
    if users.find_by_email(email).await?.is_some() {
        warn!(email = %email, "Bootstrap email belongs to an existing account, skipping bootstrap");
        return Ok(false);
    }

    validate_password_policy(password)?;
    let password_hash = hash_password(password)?;

    let user = users
        .create(NewUser {
            email,
            password_hash: &password_hash,
            display_name: "Super Admin",
            phone: None,
            role: UserRole::SuperAdmin,
            organization_id: None,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "Bootstrapped super admin");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skips_without_credentials() {
        // No credentials means the pool is never touched.
        let pool = persistence::db::create_lazy_pool(&persistence::db::DatabaseConfig {
            url: "postgres://localhost:1/unused".into(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_secs: 1,
            idle_timeout_secs: 1,
        })
        .unwrap();

        let created = bootstrap_super_admin(&pool, &BootstrapConfig::default())
            .await
            .unwrap();
        assert!(!created);
    }
}
