//! Metrics definitions for Meetgate.
//!
//! All metrics follow Prometheus naming conventions:
//! - `mg_` prefix for Meetgate
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 4 values (GET, POST, PATCH, DELETE)
//! - `endpoint`: parameterized paths, ~4 values
//! - `operation`: bounded by code (create_meeting, get_meeting, ...)
//! - `status`: success/error, or a status-code string
//! - `reason`: bounded by rejection variants

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `mg_http_requests_total`, `mg_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code`
///
/// This captures ALL HTTP responses including framework-level errors like
/// 404 Not Found and 405 Method Not Allowed.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);

    histogram!("mg_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone()
    )
    .record(duration.as_secs_f64());

    counter!("mg_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Normalize endpoint path to prevent label cardinality explosion
///
/// Replaces dynamic segments (user ids, meeting ids) with placeholders.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" => "/".to_string(),
        "/health" => "/health".to_string(),
        "/metrics" => "/metrics".to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

/// Normalize proxied paths with dynamic segments.
fn normalize_dynamic_endpoint(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();

    // .../users/{user_id}/meetings
    if path.ends_with("/meetings") {
        if let Some(pos) = parts.iter().position(|p| *p == "users") {
            if pos + 2 == parts.len().saturating_sub(1) {
                let prefix = parts.get(..pos).map(|p| p.join("/")).unwrap_or_default();
                return format!("{}/users/{{user_id}}/meetings", prefix);
            }
        }
    }

    // .../meetings/{meeting_id}
    if let Some(pos) = parts.iter().position(|p| *p == "meetings") {
        if pos == parts.len().saturating_sub(2) {
            let prefix = parts.get(..pos).map(|p| p.join("/")).unwrap_or_default();
            return format!("{}/meetings/{{meeting_id}}", prefix);
        }
    }

    "/other".to_string()
}

// ============================================================================
// Upstream Call Metrics
// ============================================================================

/// Record an outbound upstream API call.
///
/// Metric: `mg_upstream_requests_total`, `mg_upstream_request_duration_seconds`
/// Labels: `operation` (create_meeting, get_meeting, update_meeting,
/// delete_meeting), `status` ("success", "error")
pub fn record_upstream_request(operation: &str, status: &str, duration: Duration) {
    histogram!("mg_upstream_request_duration_seconds",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("mg_upstream_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record a database query.
///
/// Metric: `mg_db_queries_total`, `mg_db_query_duration_seconds`
/// Labels: `operation` (ensure_application, record_meeting, find_meeting),
/// `status` ("success", "error")
pub fn record_db_query(operation: &str, status: &str, duration: Duration) {
    histogram!("mg_db_query_duration_seconds",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("mg_db_queries_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Record an authentication/authorization rejection.
///
/// Metric: `mg_auth_rejections_total`
/// Labels: `reason` (static_header, gateway_header)
pub fn record_auth_rejection(reason: &str) {
    counter!("mg_auth_rejections_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}
