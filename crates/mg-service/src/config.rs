//! Meetgate configuration.
//!
//! Configuration is loaded from environment variables. All sensitive
//! fields (database URL, upstream API credentials, static auth header
//! values) are redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default inbound route prefix for the proxied meeting API.
pub const DEFAULT_ROUTE_PREFIX: &str = "/v2";

/// Default upstream request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 10;

/// Default gateway header carrying the API identifier.
pub const DEFAULT_GATEWAY_API_HEADER: &str = "x-api";

/// Default gateway header carrying the application identifier.
pub const DEFAULT_GATEWAY_APPLICATION_HEADER: &str = "x-api-application";

/// Default gateway header carrying the subscription identifier.
pub const DEFAULT_GATEWAY_SUBSCRIPTION_HEADER: &str = "x-api-subscription";

/// Meetgate configuration.
///
/// Loaded from environment variables with sensible defaults.
/// Secrets are redacted in Debug output to prevent credential leakage.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the upstream meeting API (e.g. "https://api.example.com/").
    pub upstream_base_url: String,

    /// Static per-deployment headers sent on every upstream request
    /// (e.g. an upstream API key). Never overridable by caller headers.
    pub upstream_api_headers: HashMap<String, String>,

    /// Upstream request timeout in seconds. Always finite.
    pub upstream_timeout_seconds: u64,

    /// Static header authentication map. `None` disables the check;
    /// otherwise every configured header must match exactly.
    pub static_auth_headers: Option<HashMap<String, String>>,

    /// Names of the three gateway identity headers.
    pub gateway_headers: GatewayHeaderNames,

    /// Inbound route prefix for the proxied API (default: "/v2").
    pub route_prefix: String,
}

/// Names of the gateway-injected identity headers.
#[derive(Debug, Clone)]
pub struct GatewayHeaderNames {
    /// Header carrying the API identifier.
    pub api: String,
    /// Header carrying the application identifier (the provisioning key).
    pub application: String,
    /// Header carrying the subscription identifier.
    pub subscription: String,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("upstream_base_url", &self.upstream_base_url)
            .field("upstream_api_headers", &"[REDACTED]")
            .field("upstream_timeout_seconds", &self.upstream_timeout_seconds)
            .field(
                "static_auth_headers",
                &self.static_auth_headers.as_ref().map(|_| "[REDACTED]"),
            )
            .field("gateway_headers", &self.gateway_headers)
            .field("route_prefix", &self.route_prefix)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid upstream base URL: {0}")]
    InvalidUpstreamBaseUrl(String),

    #[error("Invalid upstream timeout configuration: {0}")]
    InvalidUpstreamTimeout(String),

    #[error("Invalid header map in {0}: {1}")]
    InvalidHeaderMap(String, String),

    #[error("Invalid route prefix: {0}")]
    InvalidRoutePrefix(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let upstream_base_url = vars
            .get("UPSTREAM_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("UPSTREAM_BASE_URL".to_string()))?
            .clone();

        if !upstream_base_url.starts_with("http://") && !upstream_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUpstreamBaseUrl(format!(
                "UPSTREAM_BASE_URL must be an absolute http(s) URL, got '{}'",
                upstream_base_url
            )));
        }

        let upstream_api_headers = match vars.get("UPSTREAM_API_HEADERS") {
            Some(raw) => parse_header_map("UPSTREAM_API_HEADERS", raw)?,
            None => HashMap::new(),
        };

        // Parse upstream timeout with validation; the outbound call must
        // always be bounded by a finite timeout.
        let upstream_timeout_seconds =
            if let Some(value_str) = vars.get("UPSTREAM_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidUpstreamTimeout(format!(
                        "UPSTREAM_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidUpstreamTimeout(
                        "UPSTREAM_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_UPSTREAM_TIMEOUT_SECONDS
            };

        // Absent variable disables static header authentication entirely.
        let static_auth_headers = match vars.get("STATIC_AUTH_HEADERS") {
            Some(raw) => Some(parse_header_map("STATIC_AUTH_HEADERS", raw)?),
            None => None,
        };

        let gateway_headers = GatewayHeaderNames {
            api: vars
                .get("GATEWAY_API_HEADER")
                .cloned()
                .unwrap_or_else(|| DEFAULT_GATEWAY_API_HEADER.to_string()),
            application: vars
                .get("GATEWAY_APPLICATION_HEADER")
                .cloned()
                .unwrap_or_else(|| DEFAULT_GATEWAY_APPLICATION_HEADER.to_string()),
            subscription: vars
                .get("GATEWAY_SUBSCRIPTION_HEADER")
                .cloned()
                .unwrap_or_else(|| DEFAULT_GATEWAY_SUBSCRIPTION_HEADER.to_string()),
        };

        let route_prefix = vars
            .get("ROUTE_PREFIX")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.to_string());

        if !route_prefix.starts_with('/') || route_prefix.ends_with('/') {
            return Err(ConfigError::InvalidRoutePrefix(format!(
                "ROUTE_PREFIX must start with '/' and not end with '/', got '{}'",
                route_prefix
            )));
        }

        Ok(Config {
            database_url,
            bind_address,
            upstream_base_url,
            upstream_api_headers,
            upstream_timeout_seconds,
            static_auth_headers,
            gateway_headers,
            route_prefix,
        })
    }
}

/// Parse a JSON object of header name/value pairs from an env var.
fn parse_header_map(var: &str, raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    serde_json::from_str::<HashMap<String, String>>(raw)
        .map_err(|e| ConfigError::InvalidHeaderMap(var.to_string(), e.to_string()))
}
