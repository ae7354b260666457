//! Route definitions for the `/matching` resource.
//!
//! Program-scoped routes reuse the `{id}` segment name because they share
//! a path position with the match-scoped ones.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::matching;
use crate::state::AppState;

/// ```text
/// GET    /my-requests       my_requests
/// POST   /sweep             sweep
/// GET    /{id}              get_match
/// PUT    /{id}/accept       accept_match
/// PUT    /{id}/reject       reject_match
/// GET    /{id}/my-mentees   my_mentees
/// POST   /{id}/run          run_program
/// GET    /{id}/matches      list_program_matches
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my-requests", get(matching::my_requests))
        .route("/sweep", post(matching::sweep))
        .route("/{id}", get(matching::get_match))
        .route("/{id}/accept", put(matching::accept_match))
        .route("/{id}/reject", put(matching::reject_match))
        .route("/{id}/my-mentees", get(matching::my_mentees))
        .route("/{id}/run", post(matching::run_program))
        .route("/{id}/matches", get(matching::list_program_matches))
}
