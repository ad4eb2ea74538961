//! Meetgate error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Rejection responses use the fixed wire format `{"error": <code>,
//! "detail": <text>}` and carry the local response-origin marker so
//! callers can distinguish them from relayed upstream responses.
//! Internal error details are logged server-side, never returned.

use crate::models::{ErrorBody, RESPONSE_FROM_HEADER, RESPONSE_FROM_LOCAL};
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Meetgate error type.
///
/// Maps to HTTP status codes:
/// - Unauthenticated, MissingGatewayHeaders, ForbiddenUserId,
///   UnknownMeetingId: 403 Forbidden
/// - UpstreamUnavailable, UpstreamContract: 502 Bad Gateway
/// - Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Static header authentication failed.
    #[error("Unauthenticated proxy request")]
    Unauthenticated,

    /// A gateway identity header is missing or not a canonical UUID.
    #[error("Gateway headers invalid: {0}")]
    MissingGatewayHeaders(String),

    /// The reserved user id "me" was used on meeting creation.
    #[error("Forbidden user id: {0}")]
    ForbiddenUserId(String),

    /// The meeting id is not owned by the calling application.
    #[error("Unknown meeting id")]
    UnknownMeetingId,

    /// The outbound upstream call could not be completed.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream confirmed a creation the local side cannot record.
    #[error("Upstream contract violation: {0}")]
    UpstreamContract(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

impl ProxyError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Unauthenticated
            | ProxyError::MissingGatewayHeaders(_)
            | ProxyError::ForbiddenUserId(_)
            | ProxyError::UnknownMeetingId => 403,
            ProxyError::UpstreamUnavailable(_) | ProxyError::UpstreamContract(_) => 502,
            ProxyError::Database(_) | ProxyError::Internal => 500,
        }
    }

    /// Returns the wire-format error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProxyError::Unauthenticated => "unauthenticated-proxy",
            ProxyError::MissingGatewayHeaders(_) => "missing-headers",
            ProxyError::ForbiddenUserId(_) => "forbidden-user-id",
            ProxyError::UnknownMeetingId => "unknown-meeting-id",
            ProxyError::UpstreamUnavailable(_) => "upstream-unavailable",
            ProxyError::UpstreamContract(_) => "upstream-contract",
            ProxyError::Database(_) => "database-error",
            ProxyError::Internal => "internal-error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ProxyError::Unauthenticated => (StatusCode::FORBIDDEN, None),
            ProxyError::MissingGatewayHeaders(reason) => {
                (StatusCode::FORBIDDEN, Some(reason.clone()))
            }
            ProxyError::ForbiddenUserId(reason) => (StatusCode::FORBIDDEN, Some(reason.clone())),
            ProxyError::UnknownMeetingId => (
                StatusCode::FORBIDDEN,
                Some(
                    "meeting id is not known to the proxy or not associated with your application"
                        .to_string(),
                ),
            ),
            ProxyError::UpstreamUnavailable(err) => {
                // Log actual error server-side, return generic detail to client
                tracing::warn!(target: "mg.upstream", error = %err, "Upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Some("upstream meeting API is unavailable".to_string()),
                )
            }
            ProxyError::UpstreamContract(err) => {
                tracing::error!(target: "mg.upstream", error = %err, "Upstream creation response could not be recorded");
                (
                    StatusCode::BAD_GATEWAY,
                    Some("upstream returned an unusable creation response".to_string()),
                )
            }
            ProxyError::Database(err) => {
                tracing::error!(target: "mg.database", error = %err, "Database operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            ProxyError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = ErrorBody {
            error: self.error_code().to_string(),
            detail,
        };

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            RESPONSE_FROM_HEADER,
            HeaderValue::from_static(RESPONSE_FROM_LOCAL),
        );
        response
    }
}

/// Convert sqlx errors to ProxyError
impl From<sqlx::Error> for ProxyError {
    fn from(err: sqlx::Error) -> Self {
        ProxyError::Database(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    // Helper function to read the response body as JSON
    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ProxyError::Unauthenticated.status_code(), 403);
        assert_eq!(
            ProxyError::MissingGatewayHeaders("x-api".to_string()).status_code(),
            403
        );
        assert_eq!(
            ProxyError::ForbiddenUserId("me".to_string()).status_code(),
            403
        );
        assert_eq!(ProxyError::UnknownMeetingId.status_code(), 403);
        assert_eq!(
            ProxyError::UpstreamUnavailable("timeout".to_string()).status_code(),
            502
        );
        assert_eq!(
            ProxyError::UpstreamContract("no id".to_string()).status_code(),
            502
        );
        assert_eq!(ProxyError::Database("down".to_string()).status_code(), 500);
        assert_eq!(ProxyError::Internal.status_code(), 500);
    }

    #[test]
    fn test_error_codes_match_wire_contract() {
        assert_eq!(
            ProxyError::Unauthenticated.error_code(),
            "unauthenticated-proxy"
        );
        assert_eq!(
            ProxyError::MissingGatewayHeaders("x".to_string()).error_code(),
            "missing-headers"
        );
        assert_eq!(
            ProxyError::ForbiddenUserId("me".to_string()).error_code(),
            "forbidden-user-id"
        );
        assert_eq!(
            ProxyError::UnknownMeetingId.error_code(),
            "unknown-meeting-id"
        );
    }

    #[tokio::test]
    async fn test_into_response_unauthenticated() {
        let response = ProxyError::Unauthenticated.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers().get(RESPONSE_FROM_HEADER).unwrap(),
            RESPONSE_FROM_LOCAL
        );

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"], "unauthenticated-proxy");
    }

    #[tokio::test]
    async fn test_into_response_missing_headers_carries_detail() {
        let response =
            ProxyError::MissingGatewayHeaders("header 'x-api' is not a valid UUID".to_string())
                .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"], "missing-headers");
        assert_eq!(body_json["detail"], "header 'x-api' is not a valid UUID");
    }

    #[tokio::test]
    async fn test_into_response_unknown_meeting_id() {
        let response = ProxyError::UnknownMeetingId.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers().get(RESPONSE_FROM_HEADER).unwrap(),
            RESPONSE_FROM_LOCAL
        );

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"], "unknown-meeting-id");
    }

    #[tokio::test]
    async fn test_into_response_upstream_unavailable_is_502() {
        let response =
            ProxyError::UpstreamUnavailable("connect timeout".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(RESPONSE_FROM_HEADER).unwrap(),
            RESPONSE_FROM_LOCAL
        );

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"], "upstream-unavailable");
        // Actual error is logged server-side; client sees a generic detail
        assert!(!body_json["detail"]
            .as_str()
            .unwrap()
            .contains("connect timeout"));
    }

    #[tokio::test]
    async fn test_into_response_database_error_is_generic() {
        let response =
            ProxyError::Database("connection refused at 10.0.0.5".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"], "database-error");
        assert!(body_json["detail"].is_null());
    }
}
