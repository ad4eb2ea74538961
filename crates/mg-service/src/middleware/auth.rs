//! Proxy authentication middleware.
//!
//! Validates the two header layers required on every proxied request:
//!
//! 1. Static header authentication: every configured name/value pair must
//!    be present with an exactly matching value. Unconfigured deployments
//!    skip this check.
//! 2. Gateway identity headers: the API, application and subscription
//!    headers injected by the upstream gateway must each be a canonical
//!    hyphenated UUID.
//!
//! On success the extracted [`GatewayIdentity`] is inserted into request
//! extensions for handlers. No headers are mutated.

use crate::errors::ProxyError;
use crate::models::GatewayIdentity;
use crate::observability::metrics;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::config::GatewayHeaderNames;

/// State for the proxy authentication middleware.
#[derive(Clone)]
pub struct AuthConfig {
    /// Static header map; `None` disables the static check.
    pub static_headers: Option<HashMap<String, String>>,

    /// Names of the gateway identity headers.
    pub gateway_headers: GatewayHeaderNames,
}

/// Proxy authentication middleware.
///
/// Runs the static header check first, then the gateway identity check,
/// and stores the extracted identity in request extensions.
///
/// # Response
///
/// - 403 `unauthenticated-proxy` if a configured static header is absent
///   or does not match exactly
/// - 403 `missing-headers` if a gateway header is absent or malformed
/// - Continues to the next handler with [`GatewayIdentity`] in extensions
///   otherwise
#[instrument(skip(config, req, next), name = "mg.middleware.auth")]
pub async fn require_proxy_auth(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ProxyError> {
    validate_static_headers(config.static_headers.as_ref(), req.headers()).map_err(|e| {
        metrics::record_auth_rejection("static_header");
        e
    })?;

    let identity =
        extract_gateway_identity(&config.gateway_headers, req.headers()).map_err(|e| {
            metrics::record_auth_rejection("gateway_header");
            e
        })?;

    // Store identity in request extensions for downstream handlers
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Validate configured static headers against the request.
///
/// `None` means the check is disabled and always passes. Values are
/// compared byte-exactly; header names match per HTTP semantics
/// (case-insensitively).
fn validate_static_headers(
    configured: Option<&HashMap<String, String>>,
    headers: &HeaderMap,
) -> Result<(), ProxyError> {
    let Some(required) = configured else {
        return Ok(());
    };

    for (name, expected) in required {
        let matches = headers
            .get(name.as_str())
            .and_then(|v| v.to_str().ok())
            .is_some_and(|actual| actual == expected);

        if !matches {
            tracing::debug!(
                target: "mg.middleware.auth",
                header = %name,
                "Static header missing or mismatched"
            );
            return Err(ProxyError::Unauthenticated);
        }
    }

    Ok(())
}

/// Extract and validate the three gateway identity headers.
fn extract_gateway_identity(
    names: &GatewayHeaderNames,
    headers: &HeaderMap,
) -> Result<GatewayIdentity, ProxyError> {
    let api = require_uuid_header(headers, &names.api)?;
    let application = require_uuid_header(headers, &names.application)?;
    let subscription = require_uuid_header(headers, &names.subscription)?;

    Ok(GatewayIdentity {
        api,
        application,
        subscription,
    })
}

/// Require a header to be present and a canonical UUID.
fn require_uuid_header(headers: &HeaderMap, name: &str) -> Result<Uuid, ProxyError> {
    let value = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ProxyError::MissingGatewayHeaders(format!("missing required gateway header '{}'", name))
        })?;

    parse_canonical_uuid(value).ok_or_else(|| {
        ProxyError::MissingGatewayHeaders(format!(
            "gateway header '{}' is not a valid UUID",
            name
        ))
    })
}

/// Parse a canonical hyphenated UUID of any version.
///
/// Accepts upper- and lowercase hex; rejects the braced, URN and compact
/// forms that `Uuid::try_parse` would otherwise allow.
fn parse_canonical_uuid(value: &str) -> Option<Uuid> {
    let parsed = Uuid::try_parse(value).ok()?;
    value
        .eq_ignore_ascii_case(&parsed.as_hyphenated().to_string())
        .then_some(parsed)
}
