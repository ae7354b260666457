#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use alumni_api::auth::jwt::{generate_access_token, JwtConfig};
use alumni_api::config::ServerConfig;
use alumni_api::routes;
use alumni_api::state::AppState;
use alumni_core::types::DbId;
use alumni_events::EventBus;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const STAFF_ID: DbId = 1;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        match_response_days: 7,
        sweep_interval_secs: 300,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// [`build_test_app`] publishing onto a bus the test can subscribe to.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        event_bus,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Mint a bearer token accepted by [`build_test_app`].
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).expect("token should encode")
}

pub fn staff_token() -> String {
    token_for(STAFF_ID, "staff")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

// ---------------------------------------------------------------------------
// Seeding through the API
// ---------------------------------------------------------------------------

/// Create a program as staff and return its id.
pub async fn create_program(app: &Router, name: &str) -> DbId {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/programs",
        serde_json::json!({ "name": name, "description": "Spring cohort" }),
        &staff_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Enroll `user_id` as a mentor with the given industry and capacity.
pub async fn enroll_mentor(
    app: &Router,
    program_id: DbId,
    user_id: DbId,
    industry: &str,
    max_mentees: i32,
) {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/programs/{program_id}/mentors"),
        serde_json::json!({
            "name": format!("Mentor {user_id}"),
            "email": format!("mentor{user_id}@alumni.test"),
            "industry": industry,
            "programme": "Computer Science",
            "skills": ["rust", "career planning"],
            "max_mentees": max_mentees,
        }),
        &token_for(user_id, "alumni"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Register `user_id` as a mentee and return the registration id.
pub async fn register_mentee(
    app: &Router,
    program_id: DbId,
    user_id: DbId,
    preferred: &[DbId],
) -> DbId {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/programs/{program_id}/registrations"),
        serde_json::json!({
            "name": format!("Student {user_id}"),
            "email": format!("student{user_id}@alumni.test"),
            "class_year": 2025,
            "programme": "Computer Science",
            "industry": "Software",
            "areas_of_interest": ["rust"],
            "preferred_mentor_ids": preferred,
        }),
        &token_for(user_id, "student"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Run a matching round for the program as staff and return the report.
pub async fn run_round(app: &Router, program_id: DbId) -> serde_json::Value {
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/matching/{program_id}/run"),
        &staff_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// Pending requests for a mentor.
pub async fn my_requests(app: &Router, mentor_id: DbId) -> Vec<serde_json::Value> {
    let response = get_auth(
        app.clone(),
        "/api/v1/matching/my-requests",
        &token_for(mentor_id, "alumni"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}
