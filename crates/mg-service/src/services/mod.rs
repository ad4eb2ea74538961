//! Services for Meetgate.
//!
//! # Components
//!
//! - `upstream` - HTTP client for the upstream meeting API
//! - `relay` - Upstream response filtering and relaying

pub mod relay;
pub mod upstream;

pub use relay::UpstreamResponse;
pub use upstream::UpstreamClient;
