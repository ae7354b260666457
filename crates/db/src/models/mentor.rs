//! Program mentor enrollment models.

use alumni_core::matching::scoring::MentorProfile;
use alumni_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default capacity when a mentor does not state one.
pub const DEFAULT_MAX_MENTEES: i32 = 3;

/// A row from the `program_mentors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgramMentor {
    pub id: DbId,
    pub program_id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub industry: Option<String>,
    pub programme: Option<String>,
    pub skills: Vec<String>,
    pub max_mentees: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProgramMentor {
    pub fn profile(&self) -> MentorProfile<'_> {
        MentorProfile {
            industry: self.industry.as_deref(),
            programme: self.programme.as_deref(),
            skills: &self.skills,
        }
    }
}

/// A mentor together with their count of pending + accepted matches.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MentorWithLoad {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub mentor: ProgramMentor,
    pub active_load: i64,
}

/// Request body for `POST /programs/{id}/mentors`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollMentorRequest {
    pub name: String,
    pub email: String,
    pub industry: Option<String>,
    pub programme: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub max_mentees: Option<i32>,
}

/// DTO for inserting or refreshing a mentor enrollment.
#[derive(Debug, Clone)]
pub struct CreateProgramMentor {
    pub program_id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub industry: Option<String>,
    pub programme: Option<String>,
    pub skills: Vec<String>,
    pub max_mentees: i32,
}
