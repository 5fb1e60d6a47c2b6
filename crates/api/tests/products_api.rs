//! Product catalogue reads and writes.

mod common;

use axum::http::StatusCode;
use common::{body_json, count, create_user, delete_auth, get_auth, patch_json_auth, post_json_auth, token_for};
use nexus_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_lifecycle(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let op = create_user(&pool, "op@example.com", Role::Operator).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(&admin);

    let response = post_json_auth(
        app.clone(),
        "/api/products",
        &token,
        json!({ "name": "Seaside Condo", "price": 850000.0, "metadata": { "bedrooms": 2 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["product_type"], "real_estate");
    assert_eq!(json["data"]["metadata"]["bedrooms"], 2);
    let id = json["data"]["id"].as_i64().unwrap();

    // Operators browse the catalogue but cannot edit it.
    let list = body_json(get_auth(app.clone(), "/api/products?type=real_estate", &token_for(&op)).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/products/{id}"),
        &token_for(&op),
        json!({ "price": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/products/{id}"),
        &token,
        json!({ "price": 900000.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["price"], 900000.0);

    let response = delete_auth(app.clone(), &format!("/api/products/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(count(&pool, "products", "").await, 0);

    let response = get_auth(app, &format!("/api/products/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_price_and_metadata_are_rejected(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let response = post_json_auth(
        app.clone(),
        "/api/products",
        &token,
        json!({ "name": "Shack", "price": -5.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/products",
        &token,
        json!({ "name": "Shack", "price": 5.0, "metadata": [1, 2] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn supervisors_edit_but_cannot_delete_products(pool: PgPool) {
    let sup = create_user(&pool, "sup@example.com", Role::Supervisor).await;
    let app = common::build_test_app(pool);
    let token = token_for(&sup);

    let response = post_json_auth(
        app.clone(),
        "/api/products",
        &token,
        json!({ "name": "Penthouse", "price": 4200000.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(app, &format!("/api/products/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
