//! How database and auth failures surface over HTTP.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_user, get, get_auth, post_json_auth, token_for};
use nexus_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    create_user(&pool, "taken@example.com", Role::Operator).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/users",
        &token_for(&admin),
        json!({ "email": "Taken@Example.com", "password": "secret123", "role": "OPERATOR" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_reference_is_validation_error(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/leads",
        &token_for(&admin),
        json!({ "name": "Orphan", "email": "orphan@example.com", "operator_id": 424242 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_body_fields_are_described(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/leads",
        &token_for(&admin),
        json!({ "name": "", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "email: must be a valid email; name: is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_or_forged_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/leads").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get_auth(app, "/api/leads", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn request_id_is_echoed(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::get("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
