//! Handlers for the caller's in-app notifications.

use alumni_core::error::CoreError;
use alumni_core::types::DbId;
use alumni_db::models::notification::{Notification, NotificationListParams};
use alumni_db::repositories::{clamp_limit, clamp_offset, NotificationRepo};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// A page of notifications plus the caller's total unread count.
#[derive(Debug, Serialize)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub unread_count: i64,
}

/// GET /api/v1/notifications?unread_only=&limit=&offset=
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> AppResult<impl IntoResponse> {
    let items = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.unread_only,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(ApiResponse::ok(
        format!("{unread_count} unread notification(s)"),
        NotificationPage {
            items,
            unread_count,
        },
    )))
}

/// POST /api/v1/notifications/{id}/read
///
/// 404 when the notification does not belong to the caller or is already
/// read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if !updated {
        return Err(CoreError::not_found("Notification", id).into());
    }
    Ok(Json(ApiResponse::ok("Notification marked as read", id)))
}
