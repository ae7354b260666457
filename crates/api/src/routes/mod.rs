pub mod health;
pub mod matching;
pub mod notifications;
pub mod programs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /matching/my-requests                 pending requests for the caller (GET)
/// /matching/sweep                       run the deadline sweep now (POST, staff)
/// /matching/{id}                        one match (GET)
/// /matching/{id}/accept                 accept (PUT)
/// /matching/{id}/reject                 reject, re-match synchronously (PUT)
/// /matching/{id}/my-mentees             accepted mentees in program {id} (GET)
/// /matching/{id}/run                    matching round for program {id} (POST, staff)
/// /matching/{id}/matches                all matches in program {id} (GET, staff)
///
/// /programs                             list, create (GET, POST staff)
/// /programs/{id}                        get
/// /programs/{id}/mentors                list, enroll caller (GET, POST)
/// /programs/{id}/registrations          list (staff), register caller (GET, POST)
///
/// /notifications                        caller's notifications (GET)
/// /notifications/{id}/read              mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/matching", matching::router())
        .nest("/programs", programs::router())
        .nest("/notifications", notifications::router())
}
