use axum::{
    http::{header, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use shared::jwt::{normalize_pem, JwtConfig, JwtError};
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
    expose_error_detail, metrics_handler, metrics_middleware, rate_limit_middleware, request_id,
    require_auth, RateLimiterState,
};
use crate::routes::{
    auth, bills, dashboard, flats, health, issues, leases, notices, users, visitors,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(
            &normalize_pem(&config.jwt.private_key),
            &normalize_pem(&config.jwt.public_key),
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;
        let rate_limiter =
            RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            rate_limiter,
        })
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Development: any origin, no credentials
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let state = AppState::new(config, pool)?;
    Ok(build_router(state))
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Middleware order: auth runs first, then rate limiting (keyed on the caller)
    let protected_routes = Router::new()
        // Auth (self-service)
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/auth/password", put(auth::change_password))
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
        // Flats
        .route("/api/flats", get(flats::list_flats).post(flats::create_flat))
        .route(
            "/api/flats/:id",
            get(flats::get_flat)
                .put(flats::update_flat)
                .delete(flats::delete_flat),
        )
        .route("/api/flats/:id/occupancy", post(flats::recompute_occupancy))
        // Leases
        .route("/api/leases", get(leases::list_leases).post(leases::create_lease))
        .route("/api/leases/alerts", get(leases::lease_alerts))
        .route(
            "/api/leases/:id",
            get(leases::get_lease)
                .put(leases::update_lease)
                .delete(leases::delete_lease),
        )
        .route("/api/leases/:id/terminate", patch(leases::terminate_lease))
        // Bills
        .route("/api/bills", get(bills::list_bills).post(bills::create_bill))
        .route(
            "/api/bills/:id",
            get(bills::get_bill)
                .put(bills::update_bill)
                .delete(bills::delete_bill),
        )
        .route("/api/bills/:id/pay", patch(bills::pay_bill))
        // Notices
        .route(
            "/api/notices",
            get(notices::list_notices).post(notices::create_notice),
        )
        .route(
            "/api/notices/:id",
            get(notices::get_notice)
                .put(notices::update_notice)
                .delete(notices::delete_notice),
        )
        .route("/api/notices/:id/pin", patch(notices::toggle_pin))
        // Issues
        .route("/api/issues", get(issues::list_issues).post(issues::create_issue))
        .route(
            "/api/issues/:id",
            get(issues::get_issue)
                .put(issues::update_issue)
                .delete(issues::delete_issue),
        )
        .route("/api/issues/:id/status", patch(issues::update_issue_status))
        // Visitors
        .route(
            "/api/visitors",
            get(visitors::list_visitors).post(visitors::create_visitor),
        )
        .route(
            "/api/visitors/:id",
            get(visitors::get_visitor).delete(visitors::delete_visitor),
        )
        .route("/api/visitors/:id/status", patch(visitors::decide_visitor))
        .route("/api/visitors/:id/exit", patch(visitors::log_exit))
        // Dashboard
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            expose_error_detail,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&config))
        .with_state(state)
}
