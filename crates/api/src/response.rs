//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "message": ..., "data": ... }`.
//! Errors use the matching `{ "success": false, "message": ..., "code": ... }`
//! shape produced by [`AppError`](crate::error::AppError).

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok("Match accepted successfully", view)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
