//! Demo dataset used by `nexus-admin seed`.
//!
//! Passwords arrive pre-hashed so this crate stays free of crypto
//! dependencies. Everything is written in one transaction.

use nexus_core::claim::ClaimStatus;
use nexus_core::lead::LeadStatus;
use nexus_core::roles::Role;
use nexus_core::types::DbId;
use serde_json::json;
use sqlx::{PgConnection, PgPool};

pub const ADMIN_EMAIL: &str = "admin@nexuserp.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const USER_PASSWORD: &str = "user123";

/// Tables cleared by a reset, children before parents. `roles` is reference
/// data and survives.
const RESET_ORDER: [&str; 10] = [
    "activity_logs",
    "comments",
    "attachments",
    "claims",
    "client_products",
    "lead_products",
    "clients",
    "products",
    "leads",
    "users",
];

/// Hashes for [`ADMIN_PASSWORD`] and [`USER_PASSWORD`].
#[derive(Debug, Clone)]
pub struct SeedPasswords {
    pub admin_hash: String,
    pub user_hash: String,
}

/// Row counts written by a seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// `true` when the admin account already existed and nothing was written.
    pub skipped: bool,
    pub users: usize,
    pub products: usize,
    pub leads: usize,
    pub clients: usize,
    pub claims: usize,
    pub comments: usize,
}

/// Insert the demo dataset. With `reset`, every non-reference table is
/// emptied first; without it, an existing admin account makes this a no-op.
pub async fn run(
    pool: &PgPool,
    passwords: &SeedPasswords,
    reset: bool,
) -> Result<SeedReport, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if reset {
        for table in RESET_ORDER {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tracing::info!("Cleared existing data");
    } else {
        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(ADMIN_EMAIL)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_some() {
            return Ok(SeedReport {
                skipped: true,
                ..SeedReport::default()
            });
        }
    }

    let mut report = SeedReport::default();
    let conn = &mut *tx;

    // Users
    insert_user(conn, ADMIN_EMAIL, &passwords.admin_hash, "Admin User", Role::Admin, None).await?;
    let supervisor = insert_user(
        conn,
        "supervisor@nexuserp.com",
        &passwords.user_hash,
        "Sarah Johnson",
        Role::Supervisor,
        None,
    )
    .await?;
    let operator1 = insert_user(
        conn,
        "operator1@nexuserp.com",
        &passwords.user_hash,
        "Mike Chen",
        Role::Operator,
        Some(supervisor),
    )
    .await?;
    let operator2 = insert_user(
        conn,
        "operator2@nexuserp.com",
        &passwords.user_hash,
        "Emma Davis",
        Role::Operator,
        Some(supervisor),
    )
    .await?;
    let client_user1 = insert_user(
        conn,
        "client1@example.com",
        &passwords.user_hash,
        "Alice Johnson",
        Role::Client,
        None,
    )
    .await?;
    let client_user2 = insert_user(
        conn,
        "client2@example.com",
        &passwords.user_hash,
        "Bob Smith",
        Role::Client,
        None,
    )
    .await?;
    report.users = 6;

    // Products
    let villa = insert_product(
        conn,
        "Luxury Villa in Malibu",
        12_500_000.0,
        json!({
            "bedrooms": 6,
            "bathrooms": 7,
            "sqft": 8500,
            "location": "123 Ocean Drive, Malibu, CA 90265",
            "features": ["Ocean View", "Pool", "Smart Home", "Wine Cellar"],
        }),
    )
    .await?;
    insert_product(
        conn,
        "Downtown Penthouse",
        4_200_000.0,
        json!({
            "bedrooms": 4,
            "bathrooms": 4,
            "sqft": 4200,
            "location": "456 City Tower, Los Angeles, CA 90012",
            "features": ["City View", "Rooftop Terrace", "Concierge", "Gym"],
        }),
    )
    .await?;
    let condo = insert_product(
        conn,
        "Seaside Condo",
        850_000.0,
        json!({
            "bedrooms": 2,
            "bathrooms": 2,
            "sqft": 1500,
            "location": "789 Beach Blvd, Santa Monica, CA 90401",
            "features": ["Beach Access", "Balcony", "Parking"],
        }),
    )
    .await?;
    report.products = 3;

    // Leads
    insert_lead(conn, "Charlie Brown", "charlie@example.com", "+1-555-0101", LeadStatus::New, None)
        .await?;
    let diana = insert_lead(
        conn,
        "Diana Prince",
        "diana@example.com",
        "+1-555-0102",
        LeadStatus::Contacted,
        Some(operator1),
    )
    .await?;
    insert_lead(
        conn,
        "Ethan Hunt",
        "ethan@example.com",
        "+1-555-0103",
        LeadStatus::Qualified,
        Some(operator2),
    )
    .await?;
    insert_lead(
        conn,
        "Fiona Gallagher",
        "fiona@example.com",
        "+1-555-0104",
        LeadStatus::Proposal,
        Some(operator1),
    )
    .await?;
    report.leads = 4;

    // Clients and their products
    let client1 = insert_client(conn, client_user1).await?;
    let client2 = insert_client(conn, client_user2).await?;
    for (client_id, product_id) in [(client1, villa), (client2, condo)] {
        sqlx::query("INSERT INTO client_products (client_id, product_id) VALUES ($1, $2)")
            .bind(client_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await?;
    }
    report.clients = 2;

    // Claims
    insert_claim(
        conn,
        "Leaking Roof",
        "There is a leak in the master bedroom ceiling after the recent rain.",
        ClaimStatus::Submitted,
        client1,
        None,
    )
    .await?;
    let hvac = insert_claim(
        conn,
        "Broken HVAC",
        "The air conditioning system is not working properly.",
        ClaimStatus::InReview,
        client2,
        Some(operator1),
    )
    .await?;
    report.claims = 2;

    // Comments
    sqlx::query("INSERT INTO comments (content, user_id, lead_id) VALUES ($1, $2, $3)")
        .bind("This lead looks promising. Following up tomorrow.")
        .bind(operator1)
        .bind(diana)
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO comments (content, user_id, claim_id) VALUES ($1, $2, $3)")
        .bind("We have scheduled a site visit for next week.")
        .bind(operator1)
        .bind(hvac)
        .execute(&mut *conn)
        .await?;
    report.comments = 2;

    tx.commit().await?;
    Ok(report)
}

async fn insert_user(
    conn: &mut PgConnection,
    email: &str,
    password_hash: &str,
    name: &str,
    role: Role,
    supervisor_id: Option<DbId>,
) -> Result<DbId, sqlx::Error> {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash, name, role_id, supervisor_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role.id())
    .bind(supervisor_id)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

async fn insert_product(
    conn: &mut PgConnection,
    name: &str,
    price: f64,
    metadata: serde_json::Value,
) -> Result<DbId, sqlx::Error> {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO products (name, price, metadata) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(price)
    .bind(metadata)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

async fn insert_lead(
    conn: &mut PgConnection,
    name: &str,
    email: &str,
    phone: &str,
    status: LeadStatus,
    operator_id: Option<DbId>,
) -> Result<DbId, sqlx::Error> {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO leads (name, email, phone, status, operator_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(status.as_str())
    .bind(operator_id)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

async fn insert_client(conn: &mut PgConnection, user_id: DbId) -> Result<DbId, sqlx::Error> {
    let (id,): (DbId,) = sqlx::query_as("INSERT INTO clients (user_id) VALUES ($1) RETURNING id")
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    Ok(id)
}

async fn insert_claim(
    conn: &mut PgConnection,
    title: &str,
    description: &str,
    status: ClaimStatus,
    client_id: DbId,
    operator_id: Option<DbId>,
) -> Result<DbId, sqlx::Error> {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO claims (title, description, status, client_id, operator_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(title)
    .bind(description)
    .bind(status.as_str())
    .bind(client_id)
    .bind(operator_id)
    .fetch_one(conn)
    .await?;
    Ok(id)
}
