//! Database repositories for Meetgate.
//!
//! The registry is the only shared mutable state in the service:
//!
//! - `applications` - Implicit tenant provisioning by gateway external id
//! - `meeting_records` - Meeting ownership records for authorization

pub mod applications;
pub mod meeting_records;

pub use applications::ApplicationsRepository;
pub use meeting_records::MeetingRecordsRepository;
