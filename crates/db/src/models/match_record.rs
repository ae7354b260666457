//! Match record models.

use alumni_core::matching::scoring::ScoreBreakdown;
use alumni_core::matching::status::{MatchStatus, StatusId};
use alumni_core::matching::view::{MatchView, MenteeSnapshot};
use alumni_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `match_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchRecord {
    pub id: DbId,
    pub program_id: DbId,
    pub registration_id: DbId,
    pub mentee_user_id: DbId,
    pub mentor_user_id: DbId,
    pub status_id: StatusId,
    pub match_type: String,
    pub preferred_choice_order: Option<i16>,
    pub match_score: i16,
    pub industry_score: i16,
    pub programme_score: i16,
    pub skills_score: i16,
    pub preference_score: i16,
    pub rejection_reason: Option<String>,
    pub matched_at: Timestamp,
    pub auto_reject_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MatchRecord {
    pub fn status(&self) -> Option<MatchStatus> {
        MatchStatus::from_id(self.status_id)
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            industry_score: self.industry_score,
            programme_score: self.programme_score,
            skills_score: self.skills_score,
            preference_score: self.preference_score,
        }
    }

    /// Convert to the wire shape, optionally embedding the mentee snapshot.
    pub fn into_view(self, mentee: Option<MenteeSnapshot>) -> MatchView {
        let status = self
            .status()
            .map(MatchStatus::as_str)
            .unwrap_or("unknown")
            .to_string();
        let score_breakdown = self.breakdown();
        MatchView {
            id: self.id,
            mentee_id: self.mentee_user_id,
            mentee_registration_id: self.registration_id,
            program_id: self.program_id,
            mentor_id: self.mentor_user_id,
            match_type: self.match_type,
            preferred_choice_order: self.preferred_choice_order,
            match_score: self.match_score,
            score_breakdown,
            matched_at: self.matched_at,
            auto_reject_at: self.auto_reject_at,
            status,
            rejection_reason: self.rejection_reason,
            responded_at: self.responded_at,
            mentee_registration: mentee,
        }
    }
}

/// A match joined with its registration snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct MatchWithMentee {
    #[sqlx(flatten)]
    pub record: MatchRecord,
    pub mentee_name: String,
    pub mentee_email: String,
    pub mentee_class_year: Option<i32>,
    pub mentee_areas_of_interest: Vec<String>,
}

impl MatchWithMentee {
    pub fn into_view(self) -> MatchView {
        let snapshot = MenteeSnapshot {
            name: self.mentee_name,
            email: self.mentee_email,
            class_year: self.mentee_class_year,
            areas_of_interest: self.mentee_areas_of_interest,
        };
        self.record.into_view(Some(snapshot))
    }
}

/// DTO for inserting a new pending match.
#[derive(Debug, Clone)]
pub struct CreateMatch {
    pub program_id: DbId,
    pub registration_id: DbId,
    pub mentee_user_id: DbId,
    pub mentor_user_id: DbId,
    pub match_type: String,
    pub preferred_choice_order: Option<i16>,
    pub match_score: i16,
    pub breakdown: ScoreBreakdown,
    pub matched_at: Timestamp,
    pub auto_reject_at: Timestamp,
}

/// Request body for `PUT /matching/{id}/reject`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectMatchRequest {
    pub reason: Option<String>,
}

/// Query parameters for `GET /matching/{program_id}/matches`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
