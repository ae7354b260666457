//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_program, enroll_mentor, get, register_mentee, run_round};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["database"], true);
    assert_eq!(json["overdue_pending"], 0);
    assert_eq!(json["event_subscribers"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_matches_waiting_for_the_sweeper(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let program_id = create_program(&app, "Autumn Mentoring").await;
    enroll_mentor(&app, program_id, 101, "Software", 2).await;
    register_mentee(&app, program_id, 201, &[101]).await;
    register_mentee(&app, program_id, 202, &[101]).await;
    run_round(&app, program_id).await;

    sqlx::query(
        "UPDATE match_records SET auto_reject_at = NOW() - INTERVAL '1 hour'
         WHERE mentee_user_id = 201",
    )
    .execute(&pool)
    .await
    .unwrap();

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["overdue_pending"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn matching_routes_require_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/matching/my-requests").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAUTHORIZED");
}
