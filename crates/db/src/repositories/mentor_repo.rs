//! Repository for the `program_mentors` table.

use alumni_core::matching::status::ACTIVE_STATUS_IDS;
use alumni_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::mentor::{CreateProgramMentor, MentorWithLoad, ProgramMentor};

/// Column list for `program_mentors` queries.
const COLUMNS: &str = "id, program_id, user_id, name, email, industry, programme, skills, \
    max_mentees, created_at, updated_at";

/// Same columns, qualified with the `pm` alias for joins.
const QUALIFIED_COLUMNS: &str = "pm.id, pm.program_id, pm.user_id, pm.name, pm.email, \
    pm.industry, pm.programme, pm.skills, pm.max_mentees, pm.created_at, pm.updated_at";

/// Provides operations for mentor enrollments.
pub struct MentorRepo;

impl MentorRepo {
    /// Enroll a user as mentor, or refresh their profile if already enrolled.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreateProgramMentor,
    ) -> Result<ProgramMentor, sqlx::Error> {
        let query = format!(
            "INSERT INTO program_mentors
                (program_id, user_id, name, email, industry, programme, skills, max_mentees)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (program_id, user_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                industry = EXCLUDED.industry,
                programme = EXCLUDED.programme,
                skills = EXCLUDED.skills,
                max_mentees = EXCLUDED.max_mentees,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgramMentor>(&query)
            .bind(input.program_id)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.industry)
            .bind(&input.programme)
            .bind(&input.skills)
            .bind(input.max_mentees)
            .fetch_one(pool)
            .await
    }

    /// List a program's mentors with their active load, ordered by name.
    pub async fn list_with_load(
        conn: &mut PgConnection,
        program_id: DbId,
    ) -> Result<Vec<MentorWithLoad>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS},
                (SELECT COUNT(*) FROM match_records mr
                  WHERE mr.program_id = pm.program_id
                    AND mr.mentor_user_id = pm.user_id
                    AND mr.status_id = ANY($2)) AS active_load
             FROM program_mentors pm
             WHERE pm.program_id = $1
             ORDER BY pm.name ASC, pm.user_id ASC"
        );
        sqlx::query_as::<_, MentorWithLoad>(&query)
            .bind(program_id)
            .bind(&ACTIVE_STATUS_IDS[..])
            .fetch_all(conn)
            .await
    }

    /// Lock a mentor's enrollment row for the rest of the transaction.
    ///
    /// Serializes concurrent proposals to the same mentor so the capacity
    /// check that follows cannot race.
    pub async fn lock(
        conn: &mut PgConnection,
        program_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProgramMentor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM program_mentors
             WHERE program_id = $1 AND user_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, ProgramMentor>(&query)
            .bind(program_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Count a mentor's pending + accepted matches in a program.
    pub async fn active_load(
        conn: &mut PgConnection,
        program_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM match_records
             WHERE program_id = $1 AND mentor_user_id = $2 AND status_id = ANY($3)",
        )
        .bind(program_id)
        .bind(user_id)
        .bind(&ACTIVE_STATUS_IDS[..])
        .fetch_one(conn)
        .await
    }

    /// Whether the user is enrolled as mentor in the program.
    pub async fn is_enrolled(
        pool: &PgPool,
        program_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM program_mentors WHERE program_id = $1 AND user_id = $2
             )",
        )
        .bind(program_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
