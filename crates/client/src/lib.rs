//! Typed HTTP client for the `/matching` endpoints.
//!
//! [`MatchingClient`] covers what a mentor's dashboard does: list pending
//! requests, accept or reject them, and list accepted mentees. The
//! deadline helpers re-exported here decide whether Accept/Reject should
//! still be offered for a record.

pub mod api;

pub use alumni_core::matching::deadline::{can_respond, days_remaining, days_remaining_from_str};
pub use alumni_core::matching::view::{MatchView, MenteeSnapshot};
pub use api::{ClientError, MatchingClient};
