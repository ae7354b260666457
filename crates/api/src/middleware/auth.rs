//! Bearer-token caller identity for matching handlers.

use alumni_core::error::CoreError;
use alumni_core::roles;
use alumni_core::types::DbId;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, taken from a valid `Authorization: Bearer <jwt>` header.
///
/// Mentors and mentees are both plain users here; which side of a match
/// they are on is decided per record, see [`AuthUser::is_party_to`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    /// Whether the user may run program administration actions.
    pub fn is_staff(&self) -> bool {
        roles::is_staff(&self.role)
    }

    /// Mentor or mentee of the given match.
    pub fn is_party_to(&self, mentor_user_id: DbId, mentee_user_id: DbId) -> bool {
        self.user_id == mentor_user_id || self.user_id == mentee_user_id
    }

    /// Staff see every match; everyone else only their own.
    pub fn can_view_match(&self, mentor_user_id: DbId, mentee_user_id: DbId) -> bool {
        self.is_staff() || self.is_party_to(mentor_user_id, mentee_user_id)
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// The raw token from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
