//! Upstream meeting API HTTP client.
//!
//! Translates each inbound proxy operation into exactly one outbound call
//! against the configured upstream base URL. The outbound request carries
//! the caller's body verbatim and re-declares only the caller's
//! content-type; every other inbound header is dropped. Static deployment
//! headers (e.g. the upstream API key) are merged last and can never be
//! overridden by caller-supplied values.
//!
//! # Security
//!
//! - Requests are bounded by finite request and connect timeouts
//! - No automatic retries; upstream failures surface to the caller
//! - Deployment credentials are never logged

use crate::errors::ProxyError;
use crate::observability::metrics;
use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Default connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP client for the upstream meeting API.
#[derive(Clone)]
pub struct UpstreamClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Base URL of the upstream API.
    base_url: String,

    /// Static per-deployment headers sent on every request.
    deployment_headers: HeaderMap,
}

impl UpstreamClient {
    /// Create a new upstream client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Upstream base URL (e.g. "https://api.example.com/")
    /// * `deployment_headers` - Static headers from configuration
    /// * `timeout_seconds` - Request timeout; the outbound call is always
    ///   bounded
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Internal` if the HTTP client cannot be built
    /// or a configured header name/value is invalid.
    pub fn new(
        base_url: String,
        deployment_headers: &HashMap<String, String>,
        timeout_seconds: u64,
    ) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                tracing::error!(target: "mg.services.upstream", error = %e, "Failed to build HTTP client");
                ProxyError::Internal
            })?;

        let mut headers = HeaderMap::with_capacity(deployment_headers.len());
        for (name, value) in deployment_headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| {
                tracing::error!(target: "mg.services.upstream", header = %name, error = %e, "Invalid deployment header name");
                ProxyError::Internal
            })?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|_| {
                // Value itself is a credential; do not log it
                tracing::error!(target: "mg.services.upstream", header = %name, "Invalid deployment header value");
                ProxyError::Internal
            })?;
            headers.insert(name, value);
        }

        Ok(Self {
            client,
            base_url,
            deployment_headers: headers,
        })
    }

    /// POST create-meeting for a user.
    #[instrument(skip(self, content_type, body), fields(user_id = %user_id))]
    pub async fn create_meeting(
        &self,
        user_id: &str,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<reqwest::Response, ProxyError> {
        let url = self.join(&format!("v2/users/{}/meetings", user_id));
        self.call("create_meeting", Method::POST, url, None, content_type, body)
            .await
    }

    /// GET an existing meeting; the inbound query string is passed
    /// through unmodified.
    #[instrument(skip(self, content_type, body), fields(meeting_id = meeting_id))]
    pub async fn get_meeting(
        &self,
        meeting_id: i64,
        query: Option<&str>,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<reqwest::Response, ProxyError> {
        let url = self.join(&format!("v2/meetings/{}", meeting_id));
        self.call("get_meeting", Method::GET, url, query, content_type, body)
            .await
    }

    /// PATCH an existing meeting.
    #[instrument(skip(self, content_type, body), fields(meeting_id = meeting_id))]
    pub async fn update_meeting(
        &self,
        meeting_id: i64,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<reqwest::Response, ProxyError> {
        let url = self.join(&format!("v2/meetings/{}", meeting_id));
        self.call("update_meeting", Method::PATCH, url, None, content_type, body)
            .await
    }

    /// DELETE an existing meeting.
    #[instrument(skip(self, content_type, body), fields(meeting_id = meeting_id))]
    pub async fn delete_meeting(
        &self,
        meeting_id: i64,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<reqwest::Response, ProxyError> {
        let url = self.join(&format!("v2/meetings/{}", meeting_id));
        self.call("delete_meeting", Method::DELETE, url, None, content_type, body)
            .await
    }

    /// Issue the single outbound call for an operation.
    ///
    /// Failure to complete the call (connect error, timeout) is fatal for
    /// the request; there is no retry and no partial response.
    async fn call(
        &self,
        operation: &'static str,
        method: Method,
        url: String,
        query: Option<&str>,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<reqwest::Response, ProxyError> {
        let url = match query {
            Some(q) if !q.is_empty() => format!("{}?{}", url, q),
            _ => url,
        };

        tracing::debug!(
            target: "mg.services.upstream",
            method = %method,
            url = %url,
            "Calling upstream"
        );

        let start = Instant::now();

        let response = self
            .client
            .request(method, &url)
            .headers(self.build_headers(content_type))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream_request(operation, "error", start.elapsed());
                ProxyError::UpstreamUnavailable(e.to_string())
            })?;

        metrics::record_upstream_request(operation, "success", start.elapsed());

        Ok(response)
    }

    /// Build outbound headers: the caller's content-type first, then the
    /// deployment headers, which always win on collision.
    fn build_headers(&self, content_type: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(CONTENT_TYPE, value.clone());
        }
        for (name, value) in &self.deployment_headers {
            headers.insert(name, value.clone());
        }
        headers
    }

    /// Join a path onto the base URL, normalizing slashes.
    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
