use axum::routing::get;
use axum::Router;

use crate::handlers::programs;
use crate::state::AppState;

/// ```text
/// GET    /                        list_programs
/// POST   /                        create_program
/// GET    /{id}                    get_program
/// GET    /{id}/mentors            list_mentors
/// POST   /{id}/mentors            enroll_mentor
/// GET    /{id}/registrations      list_registrations
/// POST   /{id}/registrations      register_mentee
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(programs::list_programs).post(programs::create_program),
        )
        .route("/{id}", get(programs::get_program))
        .route(
            "/{id}/mentors",
            get(programs::list_mentors).post(programs::enroll_mentor),
        )
        .route(
            "/{id}/registrations",
            get(programs::list_registrations).post(programs::register_mentee),
        )
}
