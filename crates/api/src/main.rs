use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use facility_manager_api::app::{build_router, AppState};
use facility_manager_api::config::Config;
use facility_manager_api::jobs::{
    CleanupSessionsJob, ExpirePendingBookingsJob, JobScheduler, PoolMetricsJob,
    PruneRateLimiterJob,
};
use facility_manager_api::middleware::{init_metrics, logging::init_logging};
use facility_manager_api::services::bootstrap_super_admin;

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;
    init_metrics().context("Failed to initialize metrics")?;

    info!("Starting Facility Manager API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&(&config.database).into())
        .await
        .context("Failed to connect to database")?;

    info!("Running database migrations");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    if bootstrap_super_admin(&pool, &config.bootstrap).await? {
        info!("Bootstrap super admin created");
    }

    let addr = config.socket_addr().context("Invalid server address")?;
    let limits = config.limits.clone();
    let state = AppState::new(config, pool.clone()).context("Invalid JWT configuration")?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.register(ExpirePendingBookingsJob::new(
        pool.clone(),
        limits.pending_booking_ttl_hours,
    ));
    scheduler.register(CleanupSessionsJob::new(
        pool.clone(),
        limits.session_retention_days,
    ));
    if let Some(limiter) = state.rate_limiter.clone() {
        scheduler.register(PruneRateLimiterJob::new(limiter));
    }
    scheduler.start();

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
