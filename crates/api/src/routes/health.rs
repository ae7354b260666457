//! Unauthenticated liveness route for the matching service.

use alumni_db::repositories::MatchRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    /// Pending matches already past their deadline. Persistently non-zero
    /// means the deadline sweeper is not keeping up.
    pub overdue_pending: Option<i64>,
    /// Live event bus receivers (persistence in production).
    pub event_subscribers: usize,
}

/// GET /health
///
/// 200 with `"ok"` while the match store is reachable, 503 with
/// `"degraded"` when it is not.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let overdue_pending = match MatchRepo::count_overdue(&state.pool, Utc::now()).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the match store");
            None
        }
    };
    let database = overdue_pending.is_some();

    let (code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        overdue_pending,
        event_subscribers: state.event_bus.subscriber_count(),
    };
    (code, Json(report))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
