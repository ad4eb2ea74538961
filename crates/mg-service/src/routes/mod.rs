//! HTTP routes for Meetgate.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_proxy_auth, AuthConfig};
use crate::services::UpstreamClient;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Client for the upstream meeting API.
    pub upstream: UpstreamClient,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe with DB ping - public, unprefixed
/// - `/metrics` - Prometheus metrics endpoint - public, unprefixed
/// - `POST {prefix}/users/:user_id/meetings` - Create meeting (proxied)
/// - `GET|PATCH|DELETE {prefix}/meetings/:meeting_id` - Operate on an
///   owned meeting (proxied)
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
///
/// The proxied routes sit behind the proxy auth middleware (static
/// headers + gateway identity); operational endpoints do not.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_config = Arc::new(AuthConfig {
        static_headers: state.config.static_auth_headers.clone(),
        gateway_headers: state.config.gateway_headers.clone(),
    });

    // Operational routes (no authentication required)
    let operational_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Proxied routes (proxy authentication required)
    let proxy_routes = Router::new()
        .route(
            "/users/:user_id/meetings",
            post(handlers::create_meeting),
        )
        .route(
            "/meetings/:meeting_id",
            get(handlers::read_meeting)
                .patch(handlers::update_meeting)
                .delete(handlers::delete_meeting),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_config,
            require_proxy_auth,
        ))
        .with_state(state.clone());

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    operational_routes
        .merge(metrics_routes)
        .merge(Router::new().nest(&state.config.route_prefix, proxy_routes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
