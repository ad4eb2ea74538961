//! Meeting proxy handlers.
//!
//! Implements the two proxied operations:
//!
//! - `POST {prefix}/users/:user_id/meetings` - Create meeting for a user
//! - `GET|PATCH|DELETE {prefix}/meetings/:meeting_id` - Operate on an
//!   owned meeting
//!
//! # Authorization
//!
//! The auth middleware has already validated headers and put the gateway
//! identity in request extensions. Create provisions the application and
//! records ownership after upstream confirms; read/update/delete forward
//! only when the meeting id is owned by the calling application. Unknown
//! and foreign meeting ids are indistinguishable to the caller.

use crate::errors::ProxyError;
use crate::models::{ApplicationRow, GatewayIdentity};
use crate::repositories::{ApplicationsRepository, MeetingRecordsRepository};
use crate::routes::AppState;
use crate::services::UpstreamResponse;
use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Response,
    Extension,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The reserved user id that can never be proxied.
///
/// The registry has no way to resolve "the current user", and forwarding
/// it would leak cross-tenant ambiguity.
const RESERVED_USER_ID: &str = "me";

// ============================================================================
// Handler: POST {prefix}/users/:user_id/meetings
// ============================================================================

/// Handler for POST {prefix}/users/:user_id/meetings
///
/// Creates a meeting for a user. The request is forwarded upstream; when
/// upstream confirms the creation (201) the meeting id is recorded
/// against the calling application before the response is relayed.
///
/// # Response
///
/// - Upstream status/body/headers relayed on forward
/// - 403 `forbidden-user-id` when `user_id` is the reserved "me"
/// - 502 when the outbound call fails or the creation response carries
///   no recordable id
#[instrument(skip(state, identity, headers, body), fields(user_id = %user_id))]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<GatewayIdentity>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    if user_id == RESERVED_USER_ID {
        return Err(ProxyError::ForbiddenUserId(
            "user_id path argument cannot be 'me'".to_string(),
        ));
    }

    let application = ApplicationsRepository::ensure(&state.pool, identity.application).await?;

    info!(
        target: "mg.handlers.meetings",
        user_id = %user_id,
        application_id = %application.application_id,
        "Forwarding POST to /users/{}/meetings", user_id
    );

    let content_type = headers.get(CONTENT_TYPE);
    let response = state
        .upstream
        .create_meeting(&user_id, content_type, body)
        .await?;
    let upstream = UpstreamResponse::read(response).await?;

    // A meeting record is persisted iff upstream confirmed the creation.
    // 201 is the documented creation status; any other status is relayed
    // without recording.
    if upstream.status == StatusCode::CREATED {
        let meeting_id = extract_meeting_id(&upstream.body).ok_or_else(|| {
            ProxyError::UpstreamContract(
                "creation response did not contain a numeric meeting id".to_string(),
            )
        })?;

        MeetingRecordsRepository::record(
            &state.pool,
            application.application_id,
            &user_id,
            meeting_id,
        )
        .await?;
    }

    Ok(upstream.into_relayed())
}

// ============================================================================
// Handlers: GET|PATCH|DELETE {prefix}/meetings/:meeting_id
// ============================================================================

/// Handler for GET {prefix}/meetings/:meeting_id
///
/// Forwards the read when the meeting id is owned by the calling
/// application; the inbound query string is passed through unmodified.
#[instrument(skip(state, identity, headers, body), fields(meeting_id = meeting_id))]
pub async fn read_meeting(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<GatewayIdentity>,
    Path(meeting_id): Path<i64>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let application = authorize_meeting(&state, &identity, meeting_id).await?;

    info!(
        target: "mg.handlers.meetings",
        meeting_id = meeting_id,
        application_id = %application.application_id,
        "Forwarding GET to /meetings/{}", meeting_id
    );

    let content_type = headers.get(CONTENT_TYPE);
    let response = state
        .upstream
        .get_meeting(meeting_id, query.as_deref(), content_type, body)
        .await?;

    Ok(UpstreamResponse::read(response).await?.into_relayed())
}

/// Handler for PATCH {prefix}/meetings/:meeting_id
///
/// Forwards the update when the meeting id is owned by the calling
/// application. The ownership record itself is immutable; only the
/// upstream resource changes.
#[instrument(skip(state, identity, headers, body), fields(meeting_id = meeting_id))]
pub async fn update_meeting(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<GatewayIdentity>,
    Path(meeting_id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let application = authorize_meeting(&state, &identity, meeting_id).await?;

    info!(
        target: "mg.handlers.meetings",
        meeting_id = meeting_id,
        application_id = %application.application_id,
        "Forwarding PATCH to /meetings/{}", meeting_id
    );

    let content_type = headers.get(CONTENT_TYPE);
    let response = state
        .upstream
        .update_meeting(meeting_id, content_type, body)
        .await?;

    Ok(UpstreamResponse::read(response).await?.into_relayed())
}

/// Handler for DELETE {prefix}/meetings/:meeting_id
///
/// Forwards the delete when the meeting id is owned by the calling
/// application. The local ownership record is kept; the registry only
/// ever grows through confirmed creations.
#[instrument(skip(state, identity, headers, body), fields(meeting_id = meeting_id))]
pub async fn delete_meeting(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<GatewayIdentity>,
    Path(meeting_id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let application = authorize_meeting(&state, &identity, meeting_id).await?;

    info!(
        target: "mg.handlers.meetings",
        meeting_id = meeting_id,
        application_id = %application.application_id,
        "Forwarding DELETE to /meetings/{}", meeting_id
    );

    let content_type = headers.get(CONTENT_TYPE);
    let response = state
        .upstream
        .delete_meeting(meeting_id, content_type, body)
        .await?;

    Ok(UpstreamResponse::read(response).await?.into_relayed())
}

// ============================================================================
// Helpers
// ============================================================================

/// Provision the calling application and require that it owns the meeting.
///
/// Returns `UnknownMeetingId` both for ids that were never recorded and
/// for ids owned by a different application, so unauthorized callers
/// cannot probe for existence.
async fn authorize_meeting(
    state: &AppState,
    identity: &GatewayIdentity,
    meeting_id: i64,
) -> Result<ApplicationRow, ProxyError> {
    let application = ApplicationsRepository::ensure(&state.pool, identity.application).await?;

    match MeetingRecordsRepository::find(&state.pool, application.application_id, meeting_id)
        .await?
    {
        Some(_) => Ok(application),
        None => {
            warn!(
                target: "mg.handlers.meetings",
                meeting_id = meeting_id,
                application_id = %application.application_id,
                "Meeting id not associated with calling application"
            );
            Err(ProxyError::UnknownMeetingId)
        }
    }
}

/// Extract the numeric meeting id from an upstream creation response body.
fn extract_meeting_id(body: &[u8]) -> Option<i64> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()?
        .get("id")?
        .as_i64()
}
