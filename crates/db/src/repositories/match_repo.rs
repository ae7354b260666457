//! Repository for the `match_records` table.
//!
//! Status changes go through conditional `UPDATE ... WHERE status_id = pending`
//! statements so that two concurrent actions on one match have exactly one
//! winner.

use alumni_core::matching::status::{MatchStatus, ACTIVE_STATUS_IDS};
use alumni_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::match_record::{CreateMatch, MatchRecord, MatchWithMentee};

/// Column list for `match_records` queries.
const COLUMNS: &str = "id, program_id, registration_id, mentee_user_id, mentor_user_id, \
    status_id, match_type, preferred_choice_order, match_score, industry_score, \
    programme_score, skills_score, preference_score, rejection_reason, matched_at, \
    auto_reject_at, responded_at, created_at, updated_at";

/// Match columns qualified with `mr`, plus the registration snapshot from `r`.
const WITH_MENTEE_COLUMNS: &str = "mr.id, mr.program_id, mr.registration_id, \
    mr.mentee_user_id, mr.mentor_user_id, mr.status_id, mr.match_type, \
    mr.preferred_choice_order, mr.match_score, mr.industry_score, mr.programme_score, \
    mr.skills_score, mr.preference_score, mr.rejection_reason, mr.matched_at, \
    mr.auto_reject_at, mr.responded_at, mr.created_at, mr.updated_at, \
    r.name AS mentee_name, r.email AS mentee_email, r.class_year AS mentee_class_year, \
    r.areas_of_interest AS mentee_areas_of_interest";

/// Provides operations for match records.
pub struct MatchRepo;

impl MatchRepo {
    /// Insert a new pending match, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateMatch,
    ) -> Result<MatchRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO match_records
                (program_id, registration_id, mentee_user_id, mentor_user_id, status_id,
                 match_type, preferred_choice_order, match_score, industry_score,
                 programme_score, skills_score, preference_score, matched_at, auto_reject_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(input.program_id)
            .bind(input.registration_id)
            .bind(input.mentee_user_id)
            .bind(input.mentor_user_id)
            .bind(MatchStatus::Pending.id())
            .bind(&input.match_type)
            .bind(input.preferred_choice_order)
            .bind(input.match_score)
            .bind(input.breakdown.industry_score)
            .bind(input.breakdown.programme_score)
            .bind(input.breakdown.skills_score)
            .bind(input.breakdown.preference_score)
            .bind(input.matched_at)
            .bind(input.auto_reject_at)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MatchRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM match_records WHERE id = $1");
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a match together with its registration snapshot.
    pub async fn find_with_mentee(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MatchWithMentee>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_MENTEE_COLUMNS}
             FROM match_records mr
             JOIN mentee_registrations r ON r.id = mr.registration_id
             WHERE mr.id = $1"
        );
        sqlx::query_as::<_, MatchWithMentee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The pending or accepted match for a registration, if any.
    pub async fn find_active_for_registration(
        conn: &mut PgConnection,
        registration_id: DbId,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM match_records
             WHERE registration_id = $1 AND status_id = ANY($2)"
        );
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(registration_id)
            .bind(&ACTIVE_STATUS_IDS[..])
            .fetch_optional(conn)
            .await
    }

    /// Mentors already proposed for a registration, whatever the outcome.
    pub async fn tried_mentor_ids(
        conn: &mut PgConnection,
        registration_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT mentor_user_id FROM match_records WHERE registration_id = $1",
        )
        .bind(registration_id)
        .fetch_all(conn)
        .await
    }

    /// Pending matches addressed to a mentor, soonest deadline first.
    pub async fn list_pending_for_mentor(
        pool: &PgPool,
        mentor_user_id: DbId,
    ) -> Result<Vec<MatchWithMentee>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_MENTEE_COLUMNS}
             FROM match_records mr
             JOIN mentee_registrations r ON r.id = mr.registration_id
             WHERE mr.mentor_user_id = $1 AND mr.status_id = $2
             ORDER BY mr.auto_reject_at ASC, mr.id ASC"
        );
        sqlx::query_as::<_, MatchWithMentee>(&query)
            .bind(mentor_user_id)
            .bind(MatchStatus::Pending.id())
            .fetch_all(pool)
            .await
    }

    /// Accepted matches for a mentor within one program.
    pub async fn list_accepted_for_mentor(
        pool: &PgPool,
        mentor_user_id: DbId,
        program_id: DbId,
    ) -> Result<Vec<MatchWithMentee>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_MENTEE_COLUMNS}
             FROM match_records mr
             JOIN mentee_registrations r ON r.id = mr.registration_id
             WHERE mr.mentor_user_id = $1 AND mr.program_id = $2 AND mr.status_id = $3
             ORDER BY mr.responded_at ASC NULLS LAST, mr.id ASC"
        );
        sqlx::query_as::<_, MatchWithMentee>(&query)
            .bind(mentor_user_id)
            .bind(program_id)
            .bind(MatchStatus::Accepted.id())
            .fetch_all(pool)
            .await
    }

    /// List a program's matches, newest first, optionally filtered by status.
    pub async fn list_for_program(
        pool: &PgPool,
        program_id: DbId,
        status: Option<MatchStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let filter = if status.is_some() {
            "AND status_id = $4"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM match_records
             WHERE program_id = $1 {filter}
             ORDER BY matched_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let mut q = sqlx::query_as::<_, MatchRecord>(&query)
            .bind(program_id)
            .bind(limit)
            .bind(offset);
        if let Some(status) = status {
            q = q.bind(status.id());
        }
        q.fetch_all(pool).await
    }

    /// Move a pending match owned by `mentor_user_id` to `to`.
    ///
    /// Returns `None` when the match does not exist, belongs to another
    /// mentor, is no longer pending, or its deadline has passed at `now`.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        mentor_user_id: DbId,
        to: MatchStatus,
        reason: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE match_records
             SET status_id = $3, rejection_reason = $4, responded_at = $5, updated_at = $5
             WHERE id = $1
               AND mentor_user_id = $2
               AND status_id = $6
               AND auto_reject_at > $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(id)
            .bind(mentor_user_id)
            .bind(to.id())
            .bind(reason)
            .bind(now)
            .bind(MatchStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Pending matches whose deadline is at or before `now` and that the
    /// sweeper has not expired yet.
    pub async fn count_overdue(pool: &PgPool, now: Timestamp) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM match_records WHERE status_id = $1 AND auto_reject_at <= $2",
        )
        .bind(MatchStatus::Pending.id())
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Expire every pending match whose deadline is at or before `now`.
    pub async fn expire_overdue(
        pool: &PgPool,
        now: Timestamp,
        reason: &str,
    ) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE match_records
             SET status_id = $2, rejection_reason = $3, responded_at = $1, updated_at = $1
             WHERE status_id = $4 AND auto_reject_at <= $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(now)
            .bind(MatchStatus::Expired.id())
            .bind(reason)
            .bind(MatchStatus::Pending.id())
            .fetch_all(pool)
            .await
    }
}
