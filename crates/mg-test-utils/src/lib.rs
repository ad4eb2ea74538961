//! # Meetgate Test Utilities
//!
//! Shared test utilities for the Meetgate proxy service.
//!
//! This crate provides:
//! - Server test harness (`TestServer` for E2E tests)
//! - Gateway header and upstream wiremock helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mg_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: PgPool) -> Result<()> {
//!     let upstream = MockServer::start().await;
//!     let server = TestServer::spawn(pool, &upstream.uri()).await?;
//!     let gateway = GatewayHeaders::random();
//!     let client = reqwest::Client::new();
//!
//!     let response = gateway
//!         .apply(client.get(format!("{}/health", server.url())))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;
pub mod upstream_mock;

// Re-export commonly used items
pub use server_harness::*;
pub use upstream_mock::*;
