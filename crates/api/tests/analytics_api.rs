//! Analytics over the demo dataset.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, token_for};
use nexus_api::auth::password::hash_password;
use nexus_core::roles::Role;
use nexus_db::repositories::UserRepo;
use nexus_db::seed::{self, SeedPasswords, ADMIN_EMAIL};
use sqlx::PgPool;

async fn seeded(pool: &PgPool) {
    let passwords = SeedPasswords {
        admin_hash: hash_password("admin123").unwrap(),
        user_hash: hash_password("user123").unwrap(),
    };
    seed::run(pool, &passwords, false).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn income_breakdown_sums_client_products(pool: PgPool) {
    seeded(&pool).await;
    let admin = UserRepo::find_by_email(&pool, ADMIN_EMAIL).await.unwrap().unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/analytics/income-breakdown", &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["email"], "client1@example.com");
    assert_eq!(rows[0]["total_income"], 12_500_000.0);
    assert_eq!(rows[0]["number_of_products"], 1);
    assert_eq!(rows[1]["total_income"], 850_000.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_counts_every_status(pool: PgPool) {
    seeded(&pool).await;
    let admin = UserRepo::find_by_email(&pool, ADMIN_EMAIL).await.unwrap().unwrap();
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/analytics/summary", &token_for(&admin)).await).await;
    let data = &json["data"];
    assert_eq!(data["total_leads"], 4);
    assert_eq!(data["leads_by_status"].as_array().unwrap().len(), 7);
    assert_eq!(data["total_clients"], 2);
    assert_eq!(data["total_products"], 3);
    assert_eq!(data["total_revenue"], 13_350_000.0);
    assert_eq!(data["conversion_rate"], 33.3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analytics_and_dashboard_are_role_gated(pool: PgPool) {
    let op = create_user(&pool, "op@example.com", Role::Operator).await;
    let client = create_user(&pool, "c@example.com", Role::Client).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/analytics/income-breakdown", &token_for(&op)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Operators do get the dashboard numbers; clients do not.
    let response = get_auth(app.clone(), "/api/analytics/summary", &token_for(&op)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app, "/api/analytics/summary", &token_for(&client)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
