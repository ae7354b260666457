//! Mentor/mentee matching domain logic.
//!
//! - [`status`] -- match lifecycle states and the transition table.
//! - [`scoring`] -- sub-scores and their composition into `match_score`.
//! - [`deadline`] -- response deadlines and days-remaining math.
//! - [`selection`] -- choosing the next mentor for a registration.
//! - [`validation`] -- input checks for registrations, mentors, reasons.
//! - [`view`] -- JSON shapes exchanged with the matching client.

pub mod deadline;
pub mod scoring;
pub mod selection;
pub mod status;
pub mod validation;
pub mod view;

/// Match created from one of the mentee's ranked mentor choices.
pub const MATCH_TYPE_PREFERRED: &str = "preferred";

/// Match created by score when no preferred mentor was available.
pub const MATCH_TYPE_ALGORITHMIC: &str = "algorithmic";

/// Reason stored when a mentor rejects without giving one.
pub const DEFAULT_REJECT_REASON: &str = "No reason provided";

/// Reason stored when the sweeper expires an unanswered match.
pub const EXPIRED_REASON: &str = "Auto-rejected: response deadline passed";

/// A mentee may rank at most this many mentors.
pub const MAX_PREFERENCES: usize = 3;

/// Default number of days a mentor has to respond to a match.
pub const DEFAULT_RESPONSE_DAYS: i64 = 7;

/// Resolve the reason to store for a rejection.
///
/// Blank or missing reasons fall back to [`DEFAULT_REJECT_REASON`].
pub fn resolve_reject_reason(reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => DEFAULT_REJECT_REASON.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reason_uses_default() {
        assert_eq!(resolve_reject_reason(None), "No reason provided");
    }

    #[test]
    fn blank_reason_uses_default() {
        assert_eq!(resolve_reject_reason(Some("   ")), DEFAULT_REJECT_REASON);
    }

    #[test]
    fn given_reason_is_trimmed() {
        assert_eq!(
            resolve_reject_reason(Some("  At capacity this term ")),
            "At capacity this term"
        );
    }
}
