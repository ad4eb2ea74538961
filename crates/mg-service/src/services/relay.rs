//! Upstream response relaying.
//!
//! Copies the upstream status code and raw body byte-for-byte, filters
//! out hop-by-hop and body-framing headers that must not be blindly
//! forwarded, and stamps the response-origin marker so callers can tell
//! relayed responses from locally generated ones.

use crate::errors::ProxyError;
use crate::models::{RESPONSE_FROM_HEADER, RESPONSE_FROM_UPSTREAM};
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::Response,
};

/// Headers never forwarded from upstream responses.
///
/// Hop-by-hop headers are connection-scoped; content-encoding and
/// content-length describe the upstream wire framing, which no longer
/// holds once the body has been read and re-emitted.
const EXCLUDED_HEADERS: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "content-encoding",
    "content-length",
];

/// A fully read upstream response.
///
/// Reading the body up front lets the create path inspect the creation
/// payload before the same bytes are relayed to the caller.
#[derive(Debug)]
pub struct UpstreamResponse {
    /// Upstream status code.
    pub status: StatusCode,

    /// Upstream response headers, unfiltered.
    pub headers: HeaderMap,

    /// Raw body bytes.
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Read an upstream response to completion.
    ///
    /// A failure while reading the body counts as an incomplete upstream
    /// call and is fatal for the request.
    pub async fn read(response: reqwest::Response) -> Result<Self, ProxyError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Build the relayed response: identical status and body, filtered
    /// headers, and the `upstream` origin marker.
    pub fn into_relayed(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        for (name, value) in &self.headers {
            if is_excluded(name.as_str()) {
                continue;
            }
            response.headers_mut().append(name, value.clone());
        }

        response.headers_mut().insert(
            RESPONSE_FROM_HEADER,
            HeaderValue::from_static(RESPONSE_FROM_UPSTREAM),
        );

        response
    }
}

/// Whether a response header is in the fixed exclusion set.
///
/// `HeaderName::as_str` is already lowercase, so a direct comparison
/// suffices.
fn is_excluded(name: &str) -> bool {
    EXCLUDED_HEADERS.contains(&name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::HeaderName;
    use http_body_util::BodyExt;

    fn upstream_response(status: StatusCode, headers: Vec<(&str, &str)>) -> UpstreamResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                HeaderName::try_from(name).unwrap(),
                HeaderValue::try_from(value).unwrap(),
            );
        }
        UpstreamResponse {
            status,
            headers: map,
            body: Bytes::from_static(b"{\"id\":12340001234,\"topic\":\"Test\"}"),
        }
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_exclusion_set_membership() {
        for name in EXCLUDED_HEADERS {
            assert!(is_excluded(name), "{} should be excluded", name);
        }
        assert!(!is_excluded("content-type"));
        assert!(!is_excluded("x-custom-header"));
    }

    #[tokio::test]
    async fn test_relay_copies_status_and_body_verbatim() {
        let relayed = upstream_response(StatusCode::CREATED, vec![]).into_relayed();

        assert_eq!(relayed.status(), StatusCode::CREATED);
        let body = body_bytes(relayed).await;
        assert_eq!(body.as_ref(), b"{\"id\":12340001234,\"topic\":\"Test\"}");
    }

    #[tokio::test]
    async fn test_relay_filters_excluded_headers() {
        let relayed = upstream_response(
            StatusCode::OK,
            vec![
                ("content-type", "application/json"),
                ("content-length", "34"),
                ("transfer-encoding", "chunked"),
                ("connection", "keep-alive"),
                ("x-upstream-something", "something"),
            ],
        )
        .into_relayed();

        let headers = relayed.headers();
        assert!(headers.get("content-length").is_none());
        assert!(headers.get("transfer-encoding").is_none());
        assert!(headers.get("connection").is_none());
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(headers.get("x-upstream-something").unwrap(), "something");
    }

    #[tokio::test]
    async fn test_relay_marks_response_as_upstream() {
        let relayed = upstream_response(StatusCode::OK, vec![]).into_relayed();

        assert_eq!(
            relayed.headers().get(RESPONSE_FROM_HEADER).unwrap(),
            RESPONSE_FROM_UPSTREAM
        );
    }

    #[tokio::test]
    async fn test_relay_preserves_multi_value_headers() {
        let relayed = upstream_response(
            StatusCode::OK,
            vec![
                ("set-cookie", "a=1; Path=/"),
                ("set-cookie", "b=2; Path=/"),
            ],
        )
        .into_relayed();

        let values: Vec<_> = relayed.headers().get_all("set-cookie").iter().collect();
        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn test_relay_preserves_error_statuses() {
        // Upstream failure statuses are forwarded, never masked.
        let relayed = upstream_response(StatusCode::TOO_MANY_REQUESTS, vec![]).into_relayed();
        assert_eq!(relayed.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
