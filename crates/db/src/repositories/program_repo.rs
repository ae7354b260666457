//! Repository for the `mentoring_programs` table.

use alumni_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::program::{CreateProgram, MentoringProgram};

/// Column list for `mentoring_programs` queries.
const COLUMNS: &str = "id, name, description, response_window_days, is_active, \
    created_by, created_at, updated_at";

/// Provides CRUD operations for mentoring programs.
pub struct ProgramRepo;

impl ProgramRepo {
    /// Insert a new program, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProgram,
        created_by: DbId,
    ) -> Result<MentoringProgram, sqlx::Error> {
        let query = format!(
            "INSERT INTO mentoring_programs (name, description, response_window_days, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MentoringProgram>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.response_window_days)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a program by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MentoringProgram>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mentoring_programs WHERE id = $1");
        sqlx::query_as::<_, MentoringProgram>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a program on an already-acquired connection, typically the one
    /// holding an open transaction.
    pub async fn find_in_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<MentoringProgram>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mentoring_programs WHERE id = $1");
        sqlx::query_as::<_, MentoringProgram>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List active programs, ordered by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<MentoringProgram>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mentoring_programs
             WHERE is_active = true
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, MentoringProgram>(&query)
            .fetch_all(pool)
            .await
    }
}
