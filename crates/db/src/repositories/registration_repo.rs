//! Repository for the `mentee_registrations` table.

use alumni_core::matching::status::ACTIVE_STATUS_IDS;
use alumni_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::registration::{CreateRegistration, MenteeRegistration};

/// Column list for `mentee_registrations` queries.
const COLUMNS: &str = "id, program_id, user_id, name, email, class_year, programme, industry, \
    areas_of_interest, preferred_mentor_ids, created_at, updated_at";

/// Provides operations for mentee registrations.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a registration. A second registration for the same
    /// (program, user) violates `uq_mentee_registrations_program_user`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRegistration,
    ) -> Result<MenteeRegistration, sqlx::Error> {
        let query = format!(
            "INSERT INTO mentee_registrations
                (program_id, user_id, name, email, class_year, programme, industry,
                 areas_of_interest, preferred_mentor_ids)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MenteeRegistration>(&query)
            .bind(input.program_id)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.class_year)
            .bind(&input.programme)
            .bind(&input.industry)
            .bind(&input.areas_of_interest)
            .bind(&input.preferred_mentor_ids)
            .fetch_one(pool)
            .await
    }

    /// Lock a registration row for the rest of the transaction.
    pub async fn lock(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<MenteeRegistration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mentee_registrations WHERE id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, MenteeRegistration>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all registrations for a program, oldest first.
    pub async fn list_for_program(
        pool: &PgPool,
        program_id: DbId,
    ) -> Result<Vec<MenteeRegistration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mentee_registrations
             WHERE program_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, MenteeRegistration>(&query)
            .bind(program_id)
            .fetch_all(pool)
            .await
    }

    /// IDs of registrations in a program with no pending or accepted match,
    /// oldest first so earlier registrants get first pick.
    pub async fn list_unmatched_ids(
        pool: &PgPool,
        program_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.id FROM mentee_registrations r
             WHERE r.program_id = $1
               AND NOT EXISTS (
                   SELECT 1 FROM match_records mr
                   WHERE mr.registration_id = r.id AND mr.status_id = ANY($2)
               )
             ORDER BY r.created_at ASC, r.id ASC",
        )
        .bind(program_id)
        .bind(&ACTIVE_STATUS_IDS[..])
        .fetch_all(pool)
        .await
    }
}
