//! Mentoring program models.

use alumni_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mentoring_programs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MentoringProgram {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Overrides the server-wide response window when set.
    pub response_window_days: Option<i32>,
    pub is_active: bool,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MentoringProgram {
    /// Response window for new matches, falling back to `default_days`.
    pub fn window_days(&self, default_days: i64) -> i64 {
        self.response_window_days
            .map(i64::from)
            .unwrap_or(default_days)
    }
}

/// DTO for creating a program.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProgram {
    pub name: String,
    pub description: Option<String>,
    pub response_window_days: Option<i32>,
}
