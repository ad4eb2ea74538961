//! Authentication tests for Meetgate.
//!
//! Exercises both header validation layers over a real server:
//!
//! - Static header authentication (exact-match, disable-when-unset)
//! - Gateway identity headers (canonical UUID validation)
//!
//! Rejections must carry the local response-origin marker and the fixed
//! wire error codes.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use mg_test_utils::{
    mock_create_meeting, GatewayHeaders, TestServer, API_HEADER, APPLICATION_HEADER,
    SUBSCRIPTION_HEADER,
};
use sqlx::PgPool;
use std::collections::HashMap;
use wiremock::MockServer;

const MARKER_HEADER: &str = "x-meetgate-response-from";

#[sqlx::test(migrations = "../../migrations")]
async fn test_missing_gateway_headers_rejected(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    let server = TestServer::spawn(pool, &upstream.uri()).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/users/foo@example.com/meetings", server.proxy_url()))
        .send()
        .await?;

    assert_eq!(response.status(), 403);
    assert_eq!(
        response.headers().get(MARKER_HEADER).unwrap(),
        "meetgate"
    );

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "missing-headers");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_one_malformed_gateway_header_rejects(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    let server = TestServer::spawn(pool, &upstream.uri()).await?;
    let client = reqwest::Client::new();
    let gateway = GatewayHeaders::random();

    // Two valid headers plus one non-UUID application header
    let response = client
        .post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        ))
        .header(API_HEADER, gateway.api.to_string())
        .header(APPLICATION_HEADER, "not-a-uuid")
        .header(SUBSCRIPTION_HEADER, gateway.subscription.to_string())
        .send()
        .await?;

    assert_eq!(response.status(), 403);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "missing-headers");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains(APPLICATION_HEADER));

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_compact_uuid_form_rejected(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    let server = TestServer::spawn(pool, &upstream.uri()).await?;
    let client = reqwest::Client::new();
    let gateway = GatewayHeaders::random();

    let compact = gateway.application.simple().to_string();
    let response = client
        .post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        ))
        .header(API_HEADER, gateway.api.to_string())
        .header(APPLICATION_HEADER, compact)
        .header(SUBSCRIPTION_HEADER, gateway.subscription.to_string())
        .send()
        .await?;

    assert_eq!(response.status(), 403);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "missing-headers");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_uppercase_canonical_uuid_accepted(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    mock_create_meeting(&upstream, "foo@example.com", 12_340_001_234).await;
    let server = TestServer::spawn(pool, &upstream.uri()).await?;
    let client = reqwest::Client::new();
    let gateway = GatewayHeaders::random();

    let uppercase = gateway.application.to_string().to_uppercase();
    let response = client
        .post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        ))
        .header(API_HEADER, gateway.api.to_string())
        .header(APPLICATION_HEADER, uppercase)
        .header(SUBSCRIPTION_HEADER, gateway.subscription.to_string())
        .send()
        .await?;

    // Accepted and forwarded upstream
    assert_eq!(response.status(), 201);
    assert_eq!(response.headers().get(MARKER_HEADER).unwrap(), "upstream");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_static_auth_denies_missing_header(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    let vars = HashMap::from([(
        "STATIC_AUTH_HEADERS".to_string(),
        r#"{"authorization": "correct"}"#.to_string(),
    )]);
    let server = TestServer::spawn_with_vars(pool, &upstream.uri(), vars).await?;
    let client = reqwest::Client::new();
    let gateway = GatewayHeaders::random();

    let response = gateway
        .apply(client.post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        )))
        .send()
        .await?;

    assert_eq!(response.status(), 403);
    assert_eq!(response.headers().get(MARKER_HEADER).unwrap(), "meetgate");

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "unauthenticated-proxy");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_static_auth_denies_wrong_value(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    let vars = HashMap::from([(
        "STATIC_AUTH_HEADERS".to_string(),
        r#"{"authorization": "correct"}"#.to_string(),
    )]);
    let server = TestServer::spawn_with_vars(pool, &upstream.uri(), vars).await?;
    let client = reqwest::Client::new();
    let gateway = GatewayHeaders::random();

    let response = gateway
        .apply(client.post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        )))
        .header("authorization", "wrong")
        .send()
        .await?;

    assert_eq!(response.status(), 403);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "unauthenticated-proxy");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_static_auth_allows_exact_match(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    mock_create_meeting(&upstream, "foo@example.com", 12_340_001_234).await;
    let vars = HashMap::from([(
        "STATIC_AUTH_HEADERS".to_string(),
        r#"{"authorization": "correct"}"#.to_string(),
    )]);
    let server = TestServer::spawn_with_vars(pool, &upstream.uri(), vars).await?;
    let client = reqwest::Client::new();
    let gateway = GatewayHeaders::random();

    let response = gateway
        .apply(client.post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        )))
        .header("authorization", "correct")
        .send()
        .await?;

    assert_eq!(response.status(), 201);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_static_check_runs_before_gateway_check(pool: PgPool) -> Result<()> {
    let upstream = MockServer::start().await;
    let vars = HashMap::from([(
        "STATIC_AUTH_HEADERS".to_string(),
        r#"{"authorization": "correct"}"#.to_string(),
    )]);
    let server = TestServer::spawn_with_vars(pool, &upstream.uri(), vars).await?;
    let client = reqwest::Client::new();

    // Neither static nor gateway headers: the static rejection wins.
    let response = client
        .post(format!(
            "{}/users/foo@example.com/meetings",
            server.proxy_url()
        ))
        .send()
        .await?;

    assert_eq!(response.status(), 403);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "unauthenticated-proxy");

    Ok(())
}
