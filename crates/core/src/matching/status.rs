//! Match lifecycle state machine.
//!
//! Status ids match the `match_statuses` seed data (1-based SMALLINT).
//!
//! ```text
//! pending -> accepted | rejected | expired
//! ```
//!
//! `accepted`, `rejected` and `expired` are terminal. Moving a mentee on to
//! their next preference creates a new pending record rather than reviving
//! an old one.

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Lifecycle status of a match record.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending = 1,
    Accepted = 2,
    Rejected = 3,
    Expired = 4,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Pending,
        MatchStatus::Accepted,
        MatchStatus::Rejected,
        MatchStatus::Expired,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Look up a status by database ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Wire name, e.g. `"pending"`.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Expired => "expired",
        }
    }

    /// Parse a wire name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Pending and accepted matches occupy the mentee and count against
    /// the mentor's capacity.
    pub fn is_active(self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::Accepted)
    }

    pub fn is_terminal(self) -> bool {
        valid_transitions(self).is_empty()
    }
}

impl From<MatchStatus> for StatusId {
    fn from(value: MatchStatus) -> Self {
        value as StatusId
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status ids counted as "active" in SQL filters.
pub const ACTIVE_STATUS_IDS: [StatusId; 2] =
    [MatchStatus::Pending as StatusId, MatchStatus::Accepted as StatusId];

/// Rejected transition between two statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid match transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: MatchStatus,
    pub to: MatchStatus,
}

/// Returns the statuses reachable from `from`.
pub fn valid_transitions(from: MatchStatus) -> &'static [MatchStatus] {
    match from {
        MatchStatus::Pending => &[
            MatchStatus::Accepted,
            MatchStatus::Rejected,
            MatchStatus::Expired,
        ],
        MatchStatus::Accepted | MatchStatus::Rejected | MatchStatus::Expired => &[],
    }
}

pub fn can_transition(from: MatchStatus, to: MatchStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a transition, returning a [`TransitionError`] for invalid ones.
pub fn validate_transition(from: MatchStatus, to: MatchStatus) -> Result<(), TransitionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_seed_order() {
        for status in MatchStatus::ALL {
            assert_eq!(MatchStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(MatchStatus::Pending.id(), 1);
        assert_eq!(MatchStatus::Expired.id(), 4);
        assert_eq!(MatchStatus::from_id(0), None);
        assert_eq!(MatchStatus::from_id(5), None);
    }

    #[test]
    fn pending_can_reach_every_outcome() {
        assert!(can_transition(MatchStatus::Pending, MatchStatus::Accepted));
        assert!(can_transition(MatchStatus::Pending, MatchStatus::Rejected));
        assert!(can_transition(MatchStatus::Pending, MatchStatus::Expired));
        assert!(!can_transition(MatchStatus::Pending, MatchStatus::Pending));
    }

    #[test]
    fn outcomes_are_terminal() {
        for status in [
            MatchStatus::Accepted,
            MatchStatus::Rejected,
            MatchStatus::Expired,
        ] {
            assert!(status.is_terminal());
            for target in MatchStatus::ALL {
                assert!(validate_transition(status, target).is_err());
            }
        }
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = validate_transition(MatchStatus::Rejected, MatchStatus::Accepted).unwrap_err();
        assert_eq!(err.to_string(), "Invalid match transition: rejected -> accepted");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(MatchStatus::parse("Accepted"), Some(MatchStatus::Accepted));
        assert_eq!(MatchStatus::parse(" pending "), Some(MatchStatus::Pending));
        assert_eq!(MatchStatus::parse("withdrawn"), None);
    }

    #[test]
    fn only_pending_and_accepted_are_active() {
        assert!(MatchStatus::Pending.is_active());
        assert!(MatchStatus::Accepted.is_active());
        assert!(!MatchStatus::Rejected.is_active());
        assert!(!MatchStatus::Expired.is_active());
        assert_eq!(ACTIVE_STATUS_IDS, [1, 2]);
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(MatchStatus::Accepted.to_string(), "accepted");
        assert_eq!(format!("{}", MatchStatus::Expired), "expired");
    }
}
