//! Wire representation of match records.
//!
//! Field names follow the contract the SPA and `alumni-client` consume:
//! camelCase keys and `_id` for the record id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::matching::deadline;
use crate::matching::scoring::ScoreBreakdown;
use crate::types::{DbId, Timestamp};

/// Registration snapshot denormalized onto match listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenteeSnapshot {
    pub name: String,
    pub email: String,
    pub class_year: Option<i32>,
    pub areas_of_interest: Vec<String>,
}

/// A match record as returned by the `/matching` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MatchView {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub mentee_id: DbId,
    pub mentee_registration_id: DbId,
    pub program_id: DbId,
    pub mentor_id: DbId,
    /// `"preferred"` or `"algorithmic"`.
    pub match_type: String,
    pub preferred_choice_order: Option<i16>,
    pub match_score: i16,
    pub score_breakdown: ScoreBreakdown,
    pub matched_at: Timestamp,
    pub auto_reject_at: Timestamp,
    /// `"pending"`, `"accepted"`, `"rejected"` or `"expired"`.
    pub status: String,
    pub rejection_reason: Option<String>,
    pub responded_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub mentee_registration: Option<MenteeSnapshot>,
}

impl MatchView {
    /// Whole days left to respond, rounded up; 0 once the deadline passed.
    pub fn days_remaining(&self, now: Timestamp) -> i64 {
        deadline::days_remaining(self.auto_reject_at, now)
    }

    /// Accept/reject are only offered while the match is pending and the
    /// deadline has not passed.
    pub fn can_respond(&self, now: Timestamp) -> bool {
        self.status == "pending" && deadline::can_respond(self.auto_reject_at, now)
    }
}
