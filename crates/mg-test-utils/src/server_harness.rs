//! Test server harness for E2E testing
//!
//! Provides `TestServer` for spawning real Meetgate instances in tests.

use metrics_exporter_prometheus::PrometheusBuilder;
use mg_service::config::Config;
use mg_service::routes::{self, AppState};
use mg_service::services::UpstreamClient;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the Meetgate server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_health_flow_e2e(pool: PgPool) -> Result<()> {
///     let upstream = MockServer::start().await;
///     let server = TestServer::spawn(pool, &upstream.uri()).await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .get(format!("{}/health", server.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a new test server instance with default configuration.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Proxy to the given upstream base URL (typically a wiremock URI)
    /// - Start the HTTP server in the background
    ///
    /// # Arguments
    /// * `pool` - Database connection pool (typically from `#[sqlx::test]`)
    /// * `upstream_url` - Base URL of the (mock) upstream API
    pub async fn spawn(pool: PgPool, upstream_url: &str) -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(pool, upstream_url, HashMap::new()).await
    }

    /// Spawn a test server with extra configuration variables layered on
    /// top of the defaults (e.g. `STATIC_AUTH_HEADERS`, `ROUTE_PREFIX`).
    pub async fn spawn_with_vars(
        pool: PgPool,
        upstream_url: &str,
        extra_vars: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        // Build configuration for the test environment
        let mut vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://test/test".to_string(),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("UPSTREAM_BASE_URL".to_string(), upstream_url.to_string()),
            ("UPSTREAM_TIMEOUT_SECONDS".to_string(), "5".to_string()),
        ]);
        vars.extend(extra_vars);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let upstream = UpstreamClient::new(
            config.upstream_base_url.clone(),
            &config.upstream_api_headers,
            config.upstream_timeout_seconds,
        )
        .map_err(|e| anyhow::anyhow!("Failed to build upstream client: {}", e))?;

        // Build a non-global metrics recorder; installing the global
        // recorder would conflict across tests in one process.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        // Create application state
        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            upstream,
        });

        // Build routes using mg-service's real route builder
        let app = routes::build_routes(state, metrics_handle);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            _handle: handle,
        })
    }

    /// Base URL of the running server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL of the proxied API (server URL + route prefix).
    pub fn proxy_url(&self) -> String {
        format!("http://{}{}", self.addr, self.config.route_prefix)
    }

    /// Get reference to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
