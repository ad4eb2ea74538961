//! Gateway header and upstream mock helpers.
//!
//! `GatewayHeaders` builds the three identity headers the proxy requires;
//! the mock helpers register wiremock expectations shaped like the
//! upstream meeting API.

use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The default gateway identity header names used by the proxy.
pub const API_HEADER: &str = "x-api";
pub const APPLICATION_HEADER: &str = "x-api-application";
pub const SUBSCRIPTION_HEADER: &str = "x-api-subscription";

/// A gateway identity for test requests.
#[derive(Debug, Clone)]
pub struct GatewayHeaders {
    pub api: Uuid,
    pub application: Uuid,
    pub subscription: Uuid,
}

impl GatewayHeaders {
    /// A fresh random identity (a new tenant).
    pub fn random() -> Self {
        Self {
            api: Uuid::new_v4(),
            application: Uuid::new_v4(),
            subscription: Uuid::new_v4(),
        }
    }

    /// The same identity with a different application id (a different
    /// tenant behind the same gateway).
    pub fn with_other_application(&self) -> Self {
        Self {
            api: self.api,
            application: Uuid::new_v4(),
            subscription: self.subscription,
        }
    }

    /// Apply the three identity headers to a request builder.
    pub fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(API_HEADER, self.api.to_string())
            .header(APPLICATION_HEADER, self.application.to_string())
            .header(SUBSCRIPTION_HEADER, self.subscription.to_string())
    }
}

/// Mount a 201 create-meeting expectation on the mock upstream.
///
/// Responds with a JSON creation body carrying `meeting_id` plus an
/// `x-upstream-something` header useful for relay assertions.
pub async fn mock_create_meeting(server: &MockServer, user_id: &str, meeting_id: i64) {
    Mock::given(method("POST"))
        .and(path(format!("/v2/users/{}/meetings", user_id)))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"id": meeting_id, "topic": "Test"}))
                .insert_header("x-upstream-something", "something"),
        )
        .mount(server)
        .await;
}

/// Mount a create-meeting expectation with an arbitrary status and body.
pub async fn mock_create_meeting_status(
    server: &MockServer,
    user_id: &str,
    status: u16,
    body: serde_json::Value,
) {
    Mock::given(method("POST"))
        .and(path(format!("/v2/users/{}/meetings", user_id)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a 200 get-meeting expectation on the mock upstream.
pub async fn mock_get_meeting(server: &MockServer, meeting_id: i64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/meetings/{}", meeting_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
