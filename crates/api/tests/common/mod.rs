#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use nexus_api::auth::jwt::{generate_token, JwtConfig};
use nexus_api::auth::password::hash_password;
use nexus_api::config::ServerConfig;
use nexus_api::router::build_app_router;
use nexus_api::state::AppState;
use nexus_core::roles::Role;
use nexus_db::models::user::{CreateUser, User};
use nexus_db::repositories::{ClientRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// Plaintext password of every user made by [`create_user`].
pub const TEST_PASSWORD: &str = "password123";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_mins: 60,
            cookie_secure: false,
        },
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user holding `role`. CLIENT users also get a client profile.
pub async fn create_user(pool: &PgPool, email: &str, role: Role) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        name: Some(format!("{role} user")),
        phone: None,
        role_id: role.id(),
        supervisor_id: None,
    };
    if role == Role::Client {
        ClientRepo::create_with_user(pool, &input)
            .await
            .expect("client creation should succeed")
            .0
    } else {
        UserRepo::create(pool, &input)
            .await
            .expect("user creation should succeed")
    }
}

/// A valid bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    let role = user.role().expect("seeded role");
    generate_token(user.id, &user.email, role, &test_config().jwt).expect("token generation")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `SELECT COUNT(*)` with an optional `WHERE` clause.
pub async fn count(pool: &PgPool, table: &str, filter: &str) -> i64 {
    let query = if filter.is_empty() {
        format!("SELECT COUNT(*) FROM {table}")
    } else {
        format!("SELECT COUNT(*) FROM {table} WHERE {filter}")
    };
    let (n,): (i64,) = sqlx::query_as(&query).fetch_one(pool).await.unwrap();
    n
}
