use std::sync::Arc;

use alumni_core::error::CoreError;
use alumni_core::matching::deadline::{is_expired, response_deadline};
use alumni_core::matching::selection::{select_next, Candidate, SelectionInput};
use alumni_core::matching::status::{validate_transition, MatchStatus};
use alumni_core::matching::validation::validate_reason;
use alumni_core::matching::{resolve_reject_reason, EXPIRED_REASON};
use alumni_core::types::{DbId, Timestamp};
use alumni_db::models::match_record::{CreateMatch, MatchRecord};
use alumni_db::repositories::{MatchRepo, MentorRepo, ProgramRepo, RegistrationRepo};
use alumni_db::DbPool;
use alumni_events::{
    EventBus, PlatformEvent, ENTITY_MATCH, ENTITY_REGISTRATION, EVENT_MATCH_ACCEPTED,
    EVENT_MATCH_EXHAUSTED, EVENT_MATCH_EXPIRED, EVENT_MATCH_PROPOSED, EVENT_MATCH_REJECTED,
};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Result of trying to propose a mentor for one registration.
#[derive(Debug)]
pub enum ProposeOutcome {
    /// A new pending match was created.
    Proposed(MatchRecord),
    /// The registration already had a pending or accepted match.
    AlreadyActive(MatchRecord),
    /// No eligible mentor remains.
    Exhausted,
}

/// Result of a mentor rejecting a match.
#[derive(Debug)]
pub struct RejectOutcome {
    pub rejected: MatchRecord,
    /// The follow-up proposal for the same mentee, if one was made.
    pub next: Option<MatchRecord>,
}

/// Counts from a whole-program matching round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub proposed: usize,
    pub unmatched: usize,
    pub already_active: usize,
}

/// Counts from one deadline sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub expired: usize,
    pub reproposed: usize,
}

/// Drives match records through their lifecycle.
#[derive(Clone)]
pub struct MatchingEngine {
    pool: DbPool,
    event_bus: Arc<EventBus>,
    default_window_days: i64,
}

impl MatchingEngine {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>, default_window_days: i64) -> Self {
        Self {
            pool,
            event_bus,
            default_window_days,
        }
    }

    /// Propose the next mentor for a registration.
    ///
    /// Runs in one transaction holding a row lock on the registration, so
    /// concurrent proposals for the same mentee serialize. The chosen
    /// mentor's row is locked too and their load re-counted before the
    /// insert; a mentor who filled up in the meantime is skipped.
    ///
    /// Every query runs on the transaction's connection, so a proposal
    /// never holds more than one pooled connection.
    pub async fn propose_next(&self, registration_id: DbId) -> AppResult<ProposeOutcome> {
        self.propose(registration_id, false).await
    }

    /// `announce_exhausted` is set when the mentee has just lost a match;
    /// only then does running out of mentors publish `match.exhausted`.
    async fn propose(
        &self,
        registration_id: DbId,
        announce_exhausted: bool,
    ) -> AppResult<ProposeOutcome> {
        let mut tx = self.pool.begin().await?;

        let registration = RegistrationRepo::lock(&mut *tx, registration_id)
            .await?
            .ok_or_else(|| CoreError::not_found("MenteeRegistration", registration_id))?;

        if let Some(active) =
            MatchRepo::find_active_for_registration(&mut *tx, registration_id).await?
        {
            tx.commit().await?;
            return Ok(ProposeOutcome::AlreadyActive(active));
        }

        let program = ProgramRepo::find_in_tx(&mut *tx, registration.program_id)
            .await?
            .ok_or_else(|| CoreError::not_found("MentoringProgram", registration.program_id))?;
        let window_days = program.window_days(self.default_window_days);

        let tried = MatchRepo::tried_mentor_ids(&mut *tx, registration_id).await?;
        let mentors = MentorRepo::list_with_load(&mut *tx, registration.program_id).await?;
        let candidates: Vec<Candidate<'_>> = mentors
            .iter()
            .map(|m| Candidate {
                mentor_user_id: m.mentor.user_id,
                profile: m.mentor.profile(),
                active_load: m.active_load,
                capacity: i64::from(m.mentor.max_mentees),
            })
            .collect();

        let mut excluded = tried.clone();
        let created = loop {
            let input = SelectionInput {
                mentee_user_id: registration.user_id,
                mentee: registration.profile(),
                preferred_mentor_ids: &registration.preferred_mentor_ids,
                tried_mentor_ids: &excluded,
                candidates: &candidates,
            };
            let Some(selection) = select_next(&input) else {
                break None;
            };

            let locked =
                MentorRepo::lock(&mut *tx, registration.program_id, selection.mentor_user_id)
                    .await?;
            let Some(mentor) = locked else {
                excluded.push(selection.mentor_user_id);
                continue;
            };
            let load =
                MentorRepo::active_load(&mut *tx, registration.program_id, mentor.user_id).await?;
            if load >= i64::from(mentor.max_mentees) {
                tracing::debug!(
                    mentor_user_id = mentor.user_id,
                    load,
                    "Mentor filled up during proposal, trying next candidate"
                );
                excluded.push(mentor.user_id);
                continue;
            }

            let matched_at = Utc::now();
            let record = MatchRepo::create(
                &mut *tx,
                &CreateMatch {
                    program_id: registration.program_id,
                    registration_id,
                    mentee_user_id: registration.user_id,
                    mentor_user_id: selection.mentor_user_id,
                    match_type: selection.match_type.to_string(),
                    preferred_choice_order: selection.preferred_choice_order,
                    match_score: selection.match_score,
                    breakdown: selection.breakdown,
                    matched_at,
                    auto_reject_at: response_deadline(matched_at, window_days),
                },
            )
            .await?;
            break Some(record);
        };

        tx.commit().await?;

        match created {
            Some(record) => {
                tracing::info!(
                    match_id = record.id,
                    registration_id,
                    mentor_user_id = record.mentor_user_id,
                    match_type = %record.match_type,
                    match_score = record.match_score,
                    "Match proposed"
                );
                self.publish(EVENT_MATCH_PROPOSED, &record, None);
                Ok(ProposeOutcome::Proposed(record))
            }
            None => {
                tracing::info!(
                    registration_id,
                    tried = tried.len(),
                    "No eligible mentor for registration"
                );
                if announce_exhausted {
                    self.event_bus.publish(
                        PlatformEvent::new(EVENT_MATCH_EXHAUSTED)
                            .with_source(ENTITY_REGISTRATION, registration_id)
                            .with_payload(serde_json::json!({
                                "mentee_user_id": registration.user_id,
                                "program_id": registration.program_id,
                                "registration_id": registration_id,
                            })),
                    );
                }
                Ok(ProposeOutcome::Exhausted)
            }
        }
    }

    /// Accept a pending match on behalf of its mentor.
    pub async fn accept(&self, match_id: DbId, mentor_user_id: DbId) -> AppResult<MatchRecord> {
        let now = Utc::now();
        let record = match MatchRepo::respond(
            &self.pool,
            match_id,
            mentor_user_id,
            MatchStatus::Accepted,
            None,
            now,
        )
        .await?
        {
            Some(record) => record,
            None => {
                return Err(self
                    .explain_failed_response(match_id, mentor_user_id, MatchStatus::Accepted, now)
                    .await)
            }
        };

        tracing::info!(
            match_id,
            mentor_user_id,
            registration_id = record.registration_id,
            "Match accepted"
        );
        self.publish(EVENT_MATCH_ACCEPTED, &record, Some(mentor_user_id));
        Ok(record)
    }

    /// Reject a pending match and immediately propose the mentee's next
    /// candidate.
    ///
    /// A blank or missing reason is stored as the default reason. Failure
    /// of the follow-up proposal is logged, not returned: the rejection
    /// itself has already been committed.
    pub async fn reject(
        &self,
        match_id: DbId,
        mentor_user_id: DbId,
        reason: Option<&str>,
    ) -> AppResult<RejectOutcome> {
        validate_reason(reason).map_err(AppError::validation)?;
        let reason = resolve_reject_reason(reason);

        let now = Utc::now();
        let rejected = match MatchRepo::respond(
            &self.pool,
            match_id,
            mentor_user_id,
            MatchStatus::Rejected,
            Some(&reason),
            now,
        )
        .await?
        {
            Some(record) => record,
            None => {
                return Err(self
                    .explain_failed_response(match_id, mentor_user_id, MatchStatus::Rejected, now)
                    .await)
            }
        };

        tracing::info!(
            match_id,
            mentor_user_id,
            registration_id = rejected.registration_id,
            reason = %reason,
            "Match rejected"
        );
        self.publish(EVENT_MATCH_REJECTED, &rejected, Some(mentor_user_id));

        let next = self.repropose(rejected.registration_id).await;
        Ok(RejectOutcome { rejected, next })
    }

    /// Expire every pending match whose deadline has passed at `now`, then
    /// propose a replacement for each affected mentee.
    pub async fn expire_overdue(&self, now: Timestamp) -> AppResult<SweepReport> {
        let expired = MatchRepo::expire_overdue(&self.pool, now, EXPIRED_REASON).await?;

        let mut report = SweepReport {
            expired: expired.len(),
            reproposed: 0,
        };
        for record in &expired {
            tracing::info!(
                match_id = record.id,
                mentor_user_id = record.mentor_user_id,
                registration_id = record.registration_id,
                "Match expired"
            );
            self.publish(EVENT_MATCH_EXPIRED, record, None);
            if self.repropose(record.registration_id).await.is_some() {
                report.reproposed += 1;
            }
        }
        Ok(report)
    }

    /// Propose for every registration in a program that has no active match.
    pub async fn run_program(&self, program_id: DbId) -> AppResult<RunReport> {
        let program = ProgramRepo::find_by_id(&self.pool, program_id)
            .await?
            .ok_or_else(|| CoreError::not_found("MentoringProgram", program_id))?;
        if !program.is_active {
            return Err(AppError::conflict(format!(
                "Program {program_id} is not active"
            )));
        }

        let total = RegistrationRepo::list_for_program(&self.pool, program_id)
            .await?
            .len();
        let unmatched = RegistrationRepo::list_unmatched_ids(&self.pool, program_id).await?;

        let mut report = RunReport {
            already_active: total.saturating_sub(unmatched.len()),
            ..RunReport::default()
        };
        for registration_id in unmatched {
            match self.propose_next(registration_id).await {
                Ok(ProposeOutcome::Proposed(_)) => report.proposed += 1,
                Ok(ProposeOutcome::AlreadyActive(_)) => report.already_active += 1,
                Ok(ProposeOutcome::Exhausted) => report.unmatched += 1,
                Err(e) => {
                    tracing::error!(error = %e, registration_id, "Proposal failed during program run");
                    report.unmatched += 1;
                }
            }
        }

        tracing::info!(
            program_id,
            proposed = report.proposed,
            unmatched = report.unmatched,
            already_active = report.already_active,
            "Program matching round finished"
        );
        Ok(report)
    }

    /// Follow-up proposal after a match ended. Errors are logged.
    async fn repropose(&self, registration_id: DbId) -> Option<MatchRecord> {
        match self.propose(registration_id, true).await {
            Ok(ProposeOutcome::Proposed(record)) => Some(record),
            Ok(_) => None,
            Err(e) => {
                tracing::error!(error = %e, registration_id, "Follow-up proposal failed");
                None
            }
        }
    }

    /// Work out why a conditional response update matched no row.
    async fn explain_failed_response(
        &self,
        match_id: DbId,
        mentor_user_id: DbId,
        to: MatchStatus,
        now: Timestamp,
    ) -> AppError {
        let record = match MatchRepo::find_by_id(&self.pool, match_id).await {
            Ok(record) => record,
            Err(e) => return e.into(),
        };
        let Some(record) = record.filter(|r| r.mentor_user_id == mentor_user_id) else {
            return CoreError::not_found("MatchRecord", match_id).into();
        };
        let from = record.status().unwrap_or(MatchStatus::Pending);
        if let Err(e) = validate_transition(from, to) {
            return CoreError::from(e).into();
        }
        if is_expired(record.auto_reject_at, now) {
            return AppError::conflict("Response deadline has passed for this match");
        }
        // The row changed between the update and this read.
        AppError::conflict("Match was modified concurrently, please retry")
    }

    fn publish(&self, event_type: &str, record: &MatchRecord, actor: Option<DbId>) {
        let mut event = PlatformEvent::new(event_type)
            .with_source(ENTITY_MATCH, record.id)
            .with_payload(serde_json::json!({
                "mentor_user_id": record.mentor_user_id,
                "mentee_user_id": record.mentee_user_id,
                "program_id": record.program_id,
                "registration_id": record.registration_id,
                "match_type": record.match_type,
                "match_score": record.match_score,
            }));
        if let Some(user_id) = actor {
            event = event.with_actor(user_id);
        }
        self.event_bus.publish(event);
    }
}
