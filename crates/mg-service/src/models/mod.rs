//! Meetgate models.
//!
//! Contains data types used across the proxy service: database rows,
//! the gateway identity extracted by the auth middleware, and the
//! response wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response marker header name.
///
/// Every response carries this header so callers can tell whether it was
/// relayed from the upstream meeting API or generated by the proxy itself.
pub const RESPONSE_FROM_HEADER: &str = "x-meetgate-response-from";

/// Marker value for locally generated responses (rejections, errors).
pub const RESPONSE_FROM_LOCAL: &str = "meetgate";

/// Marker value for responses relayed from the upstream API.
pub const RESPONSE_FROM_UPSTREAM: &str = "upstream";

/// Gateway identity extracted from validated request headers.
///
/// Inserted into request extensions by the auth middleware; trusted as
/// already authenticated by the upstream API gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayIdentity {
    /// API identifier.
    pub api: Uuid,

    /// Application identifier; the local provisioning key.
    pub application: Uuid,

    /// Subscription identifier.
    pub subscription: Uuid,
}

/// Application database row.
///
/// Applications are provisioned implicitly on first contact and never
/// deleted through the proxy flow.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationRow {
    /// Unique application identifier.
    pub application_id: Uuid,

    /// Gateway-issued external id (canonical lowercase UUID text).
    pub external_id: String,

    /// Optional display name, settable out-of-band.
    pub display_name: Option<String>,

    /// When the application was first provisioned.
    pub created_at: DateTime<Utc>,

    /// Last provisioning touch.
    pub updated_at: DateTime<Utc>,
}

/// Meeting ownership record.
///
/// Created only after upstream confirms a meeting creation; immutable
/// thereafter.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeetingRecordRow {
    /// Unique record identifier.
    pub record_id: Uuid,

    /// Owning application.
    pub application_id: Uuid,

    /// User the meeting was created for.
    pub user_id: String,

    /// Upstream meeting id (64-bit integer).
    pub meeting_id: i64,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Rejection/error response body.
///
/// `error` is one of the fixed wire codes; `detail` is an optional
/// human-readable explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: String,

    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Database connectivity status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}
