//! Mentee registration models.

use alumni_core::matching::scoring::MenteeProfile;
use alumni_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mentee_registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenteeRegistration {
    pub id: DbId,
    pub program_id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub class_year: Option<i32>,
    pub programme: Option<String>,
    pub industry: Option<String>,
    pub areas_of_interest: Vec<String>,
    /// Ranked mentor user ids, best first.
    pub preferred_mentor_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MenteeRegistration {
    pub fn profile(&self) -> MenteeProfile<'_> {
        MenteeProfile {
            industry: self.industry.as_deref(),
            programme: self.programme.as_deref(),
            interests: &self.areas_of_interest,
        }
    }
}

/// Request body for `POST /programs/{id}/registrations`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMenteeRequest {
    pub name: String,
    pub email: String,
    pub class_year: Option<i32>,
    pub programme: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub areas_of_interest: Vec<String>,
    #[serde(default)]
    pub preferred_mentor_ids: Vec<DbId>,
}

/// DTO for inserting a registration.
#[derive(Debug, Clone)]
pub struct CreateRegistration {
    pub program_id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub class_year: Option<i32>,
    pub programme: Option<String>,
    pub industry: Option<String>,
    pub areas_of_interest: Vec<String>,
    pub preferred_mentor_ids: Vec<DbId>,
}
