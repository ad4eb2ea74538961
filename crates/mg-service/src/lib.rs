//! Meetgate Service Library
//!
//! This library provides the core functionality for Meetgate - an
//! authenticated reverse proxy for a third-party meeting API:
//!
//! - Static header and gateway identity validation
//! - Implicit application provisioning by gateway external id
//! - Per-application meeting ownership enforcement
//! - Upstream forwarding with response header filtering
//!
//! # Architecture
//!
//! Meetgate follows the Handler -> Service -> Repository pattern:
//!
//! ```text
//! routes/mod.rs -> middleware/*.rs -> handlers/*.rs -> services/*.rs
//!                                                   -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Proxy auth and HTTP metrics layers
//! - `models` - Data models and wire types
//! - `observability` - Prometheus metric helpers
//! - `repositories` - Database access for the meeting registry
//! - `routes` - Axum router setup
//! - `services` - Upstream client and response relaying

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
