use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use shared::jwt::{JwtError, TokenSigner};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    current_user, metrics_handler, metrics_middleware, rate_limit_middleware,
    require_super_admin, require_user_auth, security_headers_middleware, trace_id,
    RateLimiterState,
};
use crate::routes::{
    advertisements, auth, availability, bank_details, bookings, courts, dashboard, events, health,
    me, organizations, packages, staff, tickets, users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub token_signer: Arc<TokenSigner>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let token_signer = TokenSigner::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;
        let rate_limiter =
            RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            pool,
            config: Arc::new(config),
            rate_limiter,
            token_signer: Arc::new(token_signer),
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    Ok(build_router(AppState::new(config, pool)?))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Unauthenticated, rate limited by client address.
    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route(
            "/api/v1/public/advertisements",
            get(advertisements::list_live_advertisements),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let probe_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    // Layers run bottom-up: token check, account lookup, then rate limiting.
    let protected_routes = Router::new()
        // Current user
        .route("/api/v1/me", get(me::get_me).put(me::update_me))
        .route("/api/v1/me/password", put(me::change_password))
        .route("/api/v1/me/bookings", get(me::list_my_bookings))
        // Organizations
        .route(
            "/api/v1/organizations",
            post(organizations::create_organization).get(organizations::list_organizations),
        )
        .route(
            "/api/v1/organizations/:org_id",
            get(organizations::get_organization)
                .put(organizations::update_organization)
                .delete(organizations::delete_organization),
        )
        .route(
            "/api/v1/organizations/:org_id/status",
            put(organizations::update_organization_status),
        )
        // Users
        .route(
            "/api/v1/users",
            post(users::create_user).get(users::list_users),
        )
        .route("/api/v1/users/:user_id", get(users::get_user))
        .route("/api/v1/users/:user_id/role", put(users::update_user_role))
        .route(
            "/api/v1/users/:user_id/status",
            put(users::update_user_status),
        )
        // Staff
        .route(
            "/api/v1/organizations/:org_id/staff",
            post(staff::create_staff).get(staff::list_staff),
        )
        .route(
            "/api/v1/organizations/:org_id/staff/:user_id",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::remove_staff),
        )
        // Courts
        .route(
            "/api/v1/organizations/:org_id/courts",
            post(courts::create_court).get(courts::list_courts),
        )
        .route(
            "/api/v1/organizations/:org_id/courts/:court_id",
            get(courts::get_court)
                .put(courts::update_court)
                .delete(courts::delete_court),
        )
        // Availability
        .route(
            "/api/v1/organizations/:org_id/courts/:court_id/availability",
            put(availability::set_availability).get(availability::list_availability),
        )
        .route(
            "/api/v1/organizations/:org_id/courts/:court_id/recurring-unavailability",
            post(availability::create_recurring_rule).get(availability::list_recurring_rules),
        )
        .route(
            "/api/v1/organizations/:org_id/courts/:court_id/recurring-unavailability/:rule_id",
            axum::routing::delete(availability::delete_recurring_rule),
        )
        .route(
            "/api/v1/organizations/:org_id/courts/:court_id/schedule",
            get(availability::get_schedule),
        )
        // Bookings
        .route(
            "/api/v1/organizations/:org_id/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route(
            "/api/v1/organizations/:org_id/bookings/:booking_id",
            get(bookings::get_booking),
        )
        .route(
            "/api/v1/organizations/:org_id/bookings/:booking_id/status",
            put(bookings::update_booking_status),
        )
        // Events
        .route(
            "/api/v1/organizations/:org_id/events",
            post(events::create_event).get(events::list_events),
        )
        .route(
            "/api/v1/organizations/:org_id/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Packages
        .route(
            "/api/v1/organizations/:org_id/packages",
            post(packages::create_package).get(packages::list_packages),
        )
        .route(
            "/api/v1/organizations/:org_id/packages/:package_id",
            get(packages::get_package)
                .put(packages::update_package)
                .delete(packages::delete_package),
        )
        .route(
            "/api/v1/organizations/:org_id/packages/:package_id/bookings",
            post(packages::create_package_booking).get(packages::list_package_bookings),
        )
        .route(
            "/api/v1/organizations/:org_id/package-bookings/:booking_id",
            get(packages::get_package_booking),
        )
        .route(
            "/api/v1/organizations/:org_id/package-bookings/:booking_id/status",
            put(packages::update_package_booking_status),
        )
        // Tickets
        .route(
            "/api/v1/tickets",
            post(tickets::create_ticket).get(tickets::list_tickets),
        )
        .route("/api/v1/tickets/:ticket_id", get(tickets::get_ticket))
        .route(
            "/api/v1/tickets/:ticket_id/messages",
            post(tickets::post_message),
        )
        .route(
            "/api/v1/tickets/:ticket_id/status",
            put(tickets::update_ticket_status),
        )
        // Advertisements
        .route(
            "/api/v1/advertisements",
            post(advertisements::create_advertisement).get(advertisements::list_advertisements),
        )
        .route(
            "/api/v1/advertisements/:ad_id",
            get(advertisements::get_advertisement)
                .put(advertisements::update_advertisement)
                .delete(advertisements::delete_advertisement),
        )
        // Bank details
        .route(
            "/api/v1/organizations/:org_id/bank-details",
            get(bank_details::get_bank_details).put(bank_details::upsert_bank_details),
        )
        // Dashboard
        .route(
            "/api/v1/organizations/:org_id/dashboard",
            get(dashboard::get_organization_dashboard),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let admin_routes = Router::new()
        .route("/api/v1/admin/stats", get(dashboard::get_admin_stats))
        .route_layer(middleware::from_fn(require_super_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    Router::new()
        .merge(probe_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        // Global middleware (bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_origin_list() {
        let _ = cors_layer(&[]);
        let _ = cors_layer(&[
            "https://admin.example.com".to_string(),
            "not a header value\n".to_string(),
        ]);
    }

    #[tokio::test]
    async fn test_app_state_rejects_weak_secret() {
        let config = Config::load_for_test(&[("jwt.secret", "short")]).unwrap();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        assert!(AppState::new(config, pool).is_err());
    }

    #[tokio::test]
    async fn test_rate_limiter_disabled_by_zero() {
        let config = Config::load_for_test(&[]).unwrap();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        let state = AppState::new(config, pool).unwrap();
        assert!(state.rate_limiter.is_none());
    }
}
