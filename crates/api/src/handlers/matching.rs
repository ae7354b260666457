//! Handlers for the `/matching` resource.
//!
//! Mentors list and answer the match requests addressed to them; staff run
//! matching rounds and inspect a program's matches.

use alumni_core::error::CoreError;
use alumni_core::matching::status::MatchStatus;
use alumni_core::matching::view::MatchView;
use alumni_core::types::DbId;
use alumni_db::models::match_record::{MatchListParams, RejectMatchRequest};
use alumni_db::repositories::{clamp_limit, clamp_offset, MatchRepo};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Response body for a rejection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectResult {
    #[serde(rename = "match")]
    pub rejected: MatchView,
    /// Whether the mentee was proposed to another mentor straight away.
    pub next_match_proposed: bool,
}

/// GET /api/v1/matching/my-requests
///
/// Pending matches addressed to the caller, soonest deadline first.
pub async fn my_requests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = MatchRepo::list_pending_for_mentor(&state.pool, auth.user_id).await?;
    let views: Vec<MatchView> = rows.into_iter().map(|r| r.into_view()).collect();
    Ok(Json(ApiResponse::ok(
        format!("{} pending match request(s)", views.len()),
        views,
    )))
}

/// PUT /api/v1/matching/{id}/accept
pub async fn accept_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = state.engine().accept(id, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(
        "Match accepted successfully",
        record.into_view(None),
    )))
}

/// PUT /api/v1/matching/{id}/reject
///
/// Body `{ "reason": string }` is optional. The mentee's next candidate is
/// proposed before the response is sent.
pub async fn reject_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input: RejectMatchRequest = if body.is_empty() {
        RejectMatchRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?
    };
    let outcome = state
        .engine()
        .reject(id, auth.user_id, input.reason.as_deref())
        .await?;

    let next_match_proposed = outcome.next.is_some();
    let message = if next_match_proposed {
        "Match rejected. System will try next preference automatically"
    } else {
        "Match rejected. No further mentor is currently available"
    };
    Ok(Json(ApiResponse::ok(
        message,
        RejectResult {
            rejected: outcome.rejected.into_view(None),
            next_match_proposed,
        },
    )))
}

/// GET /api/v1/matching/{id}/my-mentees
///
/// Accepted mentees of the caller in the given program.
pub async fn my_mentees(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rows = MatchRepo::list_accepted_for_mentor(&state.pool, auth.user_id, program_id).await?;
    let views: Vec<MatchView> = rows.into_iter().map(|r| r.into_view()).collect();
    Ok(Json(ApiResponse::ok(
        format!("{} mentee(s)", views.len()),
        views,
    )))
}

/// GET /api/v1/matching/{id}
///
/// Visible to the match's mentor, its mentee, and staff. Anyone else gets
/// 404 so match ids are not enumerable.
pub async fn get_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = MatchRepo::find_with_mentee(&state.pool, id)
        .await?
        .filter(|m| auth.can_view_match(m.record.mentor_user_id, m.record.mentee_user_id))
        .ok_or_else(|| CoreError::not_found("MatchRecord", id))?;

    let view = row.into_view();
    let now = Utc::now();
    let message = if view.can_respond(now) {
        format!("{} day(s) left to respond", view.days_remaining(now))
    } else {
        format!("Match is {}", view.status)
    };
    Ok(Json(ApiResponse::ok(message, view)))
}

/// POST /api/v1/matching/{id}/run
///
/// Staff only. Proposes a mentor for every unmatched registration in the
/// program.
pub async fn run_program(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = state.engine().run_program(program_id).await?;
    tracing::info!(
        user_id = user.user_id,
        program_id,
        proposed = report.proposed,
        "Matching round triggered"
    );
    Ok(Json(ApiResponse::ok("Matching round complete", report)))
}

/// GET /api/v1/matching/{id}/matches?status=&limit=&offset=
///
/// Staff only.
pub async fn list_program_matches(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
    Query(params): Query<MatchListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(|s| {
            MatchStatus::parse(s).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Unknown status '{s}'. Expected pending, accepted, rejected or expired"
                ))
            })
        })
        .transpose()?;

    let records = MatchRepo::list_for_program(
        &state.pool,
        program_id,
        status,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    let views: Vec<MatchView> = records.into_iter().map(|r| r.into_view(None)).collect();
    Ok(Json(ApiResponse::ok(
        format!("{} match(es)", views.len()),
        views,
    )))
}

/// POST /api/v1/matching/sweep
///
/// Staff only. Runs the deadline sweep immediately.
pub async fn sweep(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = state.engine().expire_overdue(Utc::now()).await?;
    tracing::info!(
        user_id = user.user_id,
        expired = report.expired,
        reproposed = report.reproposed,
        "Manual deadline sweep"
    );
    Ok(Json(ApiResponse::ok("Deadline sweep complete", report)))
}
