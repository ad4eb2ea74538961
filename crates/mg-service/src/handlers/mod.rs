//! HTTP request handlers for Meetgate.

pub mod health;
pub mod meetings;
pub mod metrics;

pub use health::health_check;
pub use meetings::{create_meeting, delete_meeting, read_meeting, update_meeting};
pub use metrics::metrics_handler;
