//! Middleware for Meetgate.
//!
//! # Components
//!
//! - `auth` - Static header and gateway identity validation
//! - `http_metrics` - HTTP request metrics middleware

pub mod auth;
pub mod http_metrics;

pub use auth::{require_proxy_auth, AuthConfig};
pub use http_metrics::http_metrics_middleware;
