//! User management: RBAC on the list, role creation rules, self-service.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get_auth, patch_json_auth, post_json, post_json_auth,
    token_for, TEST_PASSWORD,
};
use nexus_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_cannot_list_users(pool: PgPool) {
    let client = create_user(&pool, "client@example.com", Role::Client).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/users", &token_for(&client)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_lists_users_by_role(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    create_user(&pool, "op1@example.com", Role::Operator).await;
    create_user(&pool, "op2@example.com", Role::Operator).await;
    create_user(&pool, "client@example.com", Role::Client).await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let json = body_json(get_auth(app.clone(), "/api/users?role=OPERATOR", &token).await).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["role"] == "OPERATOR"));

    let response = get_auth(app, "/api/users?role=JANITOR", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_creation_follows_hierarchy(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let supervisor = create_user(&pool, "sup@example.com", Role::Supervisor).await;
    let operator = create_user(&pool, "op@example.com", Role::Operator).await;
    let app = common::build_test_app(pool.clone());

    let body = |email: &str, role: &str| {
        json!({ "email": email, "password": "secret123", "name": "New", "role": role })
    };

    // Nobody creates another ADMIN.
    let response =
        post_json_auth(app.clone(), "/api/users", &token_for(&admin), body("a2@example.com", "ADMIN")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A supervisor creates operators but not supervisors.
    let response = post_json_auth(
        app.clone(),
        "/api/users",
        &token_for(&supervisor),
        body("s2@example.com", "SUPERVISOR"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = post_json_auth(
        app.clone(),
        "/api/users",
        &token_for(&supervisor),
        body("op2@example.com", "OPERATOR"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // An operator only creates clients, and those get a client profile.
    let response = post_json_auth(
        app.clone(),
        "/api/users",
        &token_for(&operator),
        body("buyer@example.com", "CLIENT"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "CLIENT");
    let user_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(
        common::count(&pool, "clients", &format!("user_id = {user_id}")).await,
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_password_is_rejected(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/users",
        &token_for(&admin),
        json!({ "email": "x@example.com", "password": "123", "role": "OPERATOR" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_edit_themselves_but_not_their_role(pool: PgPool) {
    let operator = create_user(&pool, "op@example.com", Role::Operator).await;
    let other = create_user(&pool, "other@example.com", Role::Operator).await;
    let app = common::build_test_app(pool);
    let token = token_for(&operator);
    let own = format!("/api/users/{}", operator.id);

    let response = patch_json_auth(app.clone(), &own, &token, json!({ "theme": "dark", "name": "Olive" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["theme"], "dark");
    assert_eq!(json["data"]["name"], "Olive");

    let response = patch_json_auth(app.clone(), &own, &token, json!({ "role": "SUPERVISOR" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(app.clone(), &own, &token, json!({ "theme": "neon" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        app,
        &format!("/api/users/{}", other.id),
        &token,
        json!({ "name": "Hijack" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let operator = create_user(&pool, "op@example.com", Role::Operator).await;
    let app = common::build_test_app(pool);
    let token = token_for(&operator);
    let uri = format!("/api/users/{}/password", operator.id);

    let response = patch_json_auth(
        app.clone(),
        &uri,
        &token,
        json!({ "current_password": "not-it", "new_password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = patch_json_auth(
        app.clone(),
        &uri,
        &token,
        json!({ "current_password": TEST_PASSWORD, "new_password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "op@example.com", "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admin_deletes_users_and_not_themselves(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let supervisor = create_user(&pool, "sup@example.com", Role::Supervisor).await;
    let operator = create_user(&pool, "op@example.com", Role::Operator).await;
    let app = common::build_test_app(pool.clone());
    let target = format!("/api/users/{}", operator.id);

    let response = delete_auth(app.clone(), &target, &token_for(&supervisor)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/users/{}", admin.id), &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app.clone(), &target, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(common::count(&pool, "users", &format!("id = {}", operator.id)).await, 0);

    let response = delete_auth(app, &target, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
