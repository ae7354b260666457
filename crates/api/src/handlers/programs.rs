//! Handlers for mentoring programs, mentor enrollment and mentee
//! registration.

use alumni_core::error::CoreError;
use alumni_core::matching::validation::{
    validate_class_year, validate_email, validate_max_mentees, validate_name,
    validate_preferences, validate_response_window, validate_tags,
};
use alumni_core::types::DbId;
use alumni_db::models::mentor::{CreateProgramMentor, EnrollMentorRequest, DEFAULT_MAX_MENTEES};
use alumni_db::models::program::{CreateProgram, MentoringProgram};
use alumni_db::models::registration::{CreateRegistration, RegisterMenteeRequest};
use alumni_db::repositories::{MentorRepo, ProgramRepo, RegistrationRepo};
use alumni_db::DbPool;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireStaff};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Load a program or fail with 404.
async fn ensure_program(pool: &DbPool, id: DbId) -> AppResult<MentoringProgram> {
    ProgramRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("MentoringProgram", id)))
}

/// Load a program that still accepts enrollments.
async fn ensure_active_program(pool: &DbPool, id: DbId) -> AppResult<MentoringProgram> {
    let program = ensure_program(pool, id).await?;
    if !program.is_active {
        return Err(AppError::conflict(format!("Program {id} is not active")));
    }
    Ok(program)
}

/// GET /api/v1/programs
pub async fn list_programs(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let programs = ProgramRepo::list_active(&state.pool).await?;
    Ok(Json(ApiResponse::ok(
        format!("{} program(s)", programs.len()),
        programs,
    )))
}

/// POST /api/v1/programs
///
/// Staff only.
pub async fn create_program(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateProgram>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name).map_err(AppError::validation)?;
    if let Some(days) = input.response_window_days {
        validate_response_window(days).map_err(AppError::validation)?;
    }

    let program = ProgramRepo::create(&state.pool, &input, user.user_id).await?;

    tracing::info!(
        user_id = user.user_id,
        program_id = program.id,
        name = %program.name,
        "Mentoring program created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Program created", program)),
    ))
}

/// GET /api/v1/programs/{id}
pub async fn get_program(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let program = ensure_program(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok("Program found", program)))
}

/// GET /api/v1/programs/{id}/mentors
///
/// Enrolled mentors with their current active load.
pub async fn list_mentors(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_program(&state.pool, id).await?;
    let mut conn = state.pool.acquire().await?;
    let mentors = MentorRepo::list_with_load(&mut *conn, id).await?;
    Ok(Json(ApiResponse::ok(
        format!("{} mentor(s)", mentors.len()),
        mentors,
    )))
}

/// POST /api/v1/programs/{id}/mentors
///
/// Enroll the caller as a mentor, or update their existing profile.
pub async fn enroll_mentor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EnrollMentorRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_active_program(&state.pool, id).await?;

    let max_mentees = input.max_mentees.unwrap_or(DEFAULT_MAX_MENTEES);
    validate_name("name", &input.name).map_err(AppError::validation)?;
    validate_email(&input.email).map_err(AppError::validation)?;
    validate_tags("skills", &input.skills).map_err(AppError::validation)?;
    validate_max_mentees(max_mentees).map_err(AppError::validation)?;

    let mentor = MentorRepo::upsert(
        &state.pool,
        &CreateProgramMentor {
            program_id: id,
            user_id: auth.user_id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            industry: input.industry,
            programme: input.programme,
            skills: input.skills,
            max_mentees,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        program_id = id,
        max_mentees,
        "Mentor enrolled"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Mentor enrolled", mentor)),
    ))
}

/// GET /api/v1/programs/{id}/registrations
///
/// Staff only.
pub async fn list_registrations(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_program(&state.pool, id).await?;
    let registrations = RegistrationRepo::list_for_program(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(
        format!("{} registration(s)", registrations.len()),
        registrations,
    )))
}

/// POST /api/v1/programs/{id}/registrations
///
/// Register the caller as a mentee. Every preferred mentor must be enrolled
/// in the program. Matching happens on the next round, not here.
pub async fn register_mentee(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RegisterMenteeRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_active_program(&state.pool, id).await?;

    validate_name("name", &input.name).map_err(AppError::validation)?;
    validate_email(&input.email).map_err(AppError::validation)?;
    validate_tags("areas_of_interest", &input.areas_of_interest)
        .map_err(AppError::validation)?;
    if let Some(year) = input.class_year {
        validate_class_year(year).map_err(AppError::validation)?;
    }
    validate_preferences(&input.preferred_mentor_ids, auth.user_id)
        .map_err(AppError::validation)?;
    for mentor_id in &input.preferred_mentor_ids {
        if !MentorRepo::is_enrolled(&state.pool, id, *mentor_id).await? {
            return Err(AppError::validation(format!(
                "Preferred mentor {mentor_id} is not enrolled in program {id}"
            )));
        }
    }

    let registration = RegistrationRepo::create(
        &state.pool,
        &CreateRegistration {
            program_id: id,
            user_id: auth.user_id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            class_year: input.class_year,
            programme: input.programme,
            industry: input.industry,
            areas_of_interest: input.areas_of_interest,
            preferred_mentor_ids: input.preferred_mentor_ids,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        program_id = id,
        registration_id = registration.id,
        preferences = registration.preferred_mentor_ids.len(),
        "Mentee registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Registration created", registration)),
    ))
}
