//! Repository for the `leads` table and the lead → client conversion.

use nexus_core::lead::LeadStatus;
use nexus_core::roles::Role;
use nexus_core::types::DbId;
use nexus_core::validation::normalize_email;
use sqlx::{PgExecutor, PgPool};

use crate::models::activity_log::NewActivity;
use crate::models::conversion::ConvertedLead;
use crate::models::lead::{CreateLead, Lead, LeadFilter, UpdateLead};
use crate::models::product::Product;
use crate::repositories::activity_log_repo::ActivityLogRepo;

/// Column list for `leads` queries.
const COLUMNS: &str = "id, name, email, phone, status, operator_id, created_at, updated_at";

/// Activity log action recorded for a conversion.
pub const ACTION_LEAD_CONVERTED: &str = "lead.converted";

/// Provides CRUD operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead, returning the created row. Status defaults to `NEW`.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        Self::create_with_products(pool, input, &[]).await
    }

    /// Insert a lead and link it to `product_ids` in one transaction. An
    /// unknown product fails the `lead_products.product_id` foreign key and
    /// nothing is written.
    pub async fn create_with_products(
        pool: &PgPool,
        input: &CreateLead,
        product_ids: &[DbId],
    ) -> Result<Lead, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO leads (name, email, phone, status, operator_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.status.unwrap_or_default().as_str())
            .bind(input.operator_id)
            .fetch_one(&mut *tx)
            .await?;

        for &product_id in product_ids {
            Self::add_product(&mut *tx, lead.id, product_id).await?;
        }

        tx.commit().await?;
        Ok(lead)
    }

    /// Find a lead by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List leads, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: LeadFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE ($1::BIGINT IS NULL OR operator_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(filter.operator_id)
            .bind(filter.status.map(LeadStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All leads for the kanban board, most recently touched first.
    pub async fn list_for_board(
        pool: &PgPool,
        operator_id: Option<DbId>,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE ($1::BIGINT IS NULL OR operator_id = $1)
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(operator_id)
            .fetch_all(pool)
            .await
    }

    /// Update a lead. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        Self::update_with_products(pool, id, input, &[]).await
    }

    /// Apply `input` and link any new `product_ids` in one transaction.
    ///
    /// Returns `None`, with nothing written, if the lead does not exist.
    pub async fn update_with_products(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
        product_ids: &[DbId],
    ) -> Result<Option<Lead>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE leads SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status),
                operator_id = COALESCE($6, operator_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(lead) = sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.status.map(LeadStatus::as_str))
            .bind(input.operator_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        for &product_id in product_ids {
            Self::add_product(&mut *tx, id, product_id).await?;
        }

        tx.commit().await?;
        Ok(Some(lead))
    }

    /// Move a lead to another pipeline column.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("UPDATE leads SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a lead with its comments and product links.
    ///
    /// Returns `true` if the lead existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE lead_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM lead_products WHERE lead_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record interest in a product. Returns `false` if it was already linked.
    pub async fn add_product<'e>(
        executor: impl PgExecutor<'e>,
        lead_id: DbId,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO lead_products (lead_id, product_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_lead_products_lead_product DO NOTHING",
        )
        .bind(lead_id)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Products a lead is interested in.
    pub async fn list_products(pool: &PgPool, lead_id: DbId) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT p.id, p.name, p.product_type, p.price, p.metadata, p.created_at, p.updated_at
             FROM products p
             JOIN lead_products lp ON lp.product_id = p.id
             WHERE lp.lead_id = $1
             ORDER BY p.name, p.id",
        )
        .bind(lead_id)
        .fetch_all(pool)
        .await
    }

    /// Convert a WON lead into a client in one transaction.
    ///
    /// Finds or creates a CLIENT user by the lead's email (new users get
    /// `new_user_password_hash`), finds or creates the client profile, copies
    /// the lead's products, deletes the lead with its comments and product
    /// links, and writes a `lead.converted` activity log entry.
    ///
    /// Returns `None` if the lead does not exist or is not WON. Any failure
    /// rolls back every write.
    pub async fn convert(
        pool: &PgPool,
        lead_id: DbId,
        new_user_password_hash: &str,
        actor_id: Option<DbId>,
    ) -> Result<Option<ConvertedLead>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM leads WHERE id = $1 AND status = $2 FOR UPDATE"
        );
        let Some(lead) = sqlx::query_as::<_, Lead>(&query)
            .bind(lead_id)
            .bind(LeadStatus::Won.as_str())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let email = normalize_email(&lead.email);

        let existing_user: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1 FOR UPDATE")
                .bind(&email)
                .fetch_optional(&mut *tx)
                .await?;
        let (user_id, user_created) = match existing_user {
            Some((id,)) => (id, false),
            None => {
                let (id,): (DbId,) = sqlx::query_as(
                    "INSERT INTO users (email, password_hash, name, phone, role_id)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id",
                )
                .bind(&email)
                .bind(new_user_password_hash)
                .bind(&lead.name)
                .bind(&lead.phone)
                .bind(Role::Client.id())
                .fetch_one(&mut *tx)
                .await?;
                (id, true)
            }
        };

        let existing_client: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM clients WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (client_id, client_created) = match existing_client {
            Some((id,)) => (id, false),
            None => {
                let (id,): (DbId,) =
                    sqlx::query_as("INSERT INTO clients (user_id) VALUES ($1) RETURNING id")
                        .bind(user_id)
                        .fetch_one(&mut *tx)
                        .await?;
                (id, true)
            }
        };

        let products_copied = sqlx::query(
            "INSERT INTO client_products (client_id, product_id)
             SELECT $1, product_id FROM lead_products WHERE lead_id = $2
             ON CONFLICT ON CONSTRAINT uq_client_products_client_product DO NOTHING",
        )
        .bind(client_id)
        .bind(lead_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        for statement in [
            "DELETE FROM comments WHERE lead_id = $1",
            "DELETE FROM lead_products WHERE lead_id = $1",
            "DELETE FROM leads WHERE id = $1",
        ] {
            sqlx::query(statement)
                .bind(lead_id)
                .execute(&mut *tx)
                .await?;
        }

        ActivityLogRepo::create(
            &mut *tx,
            &NewActivity {
                user_id: actor_id,
                action: ACTION_LEAD_CONVERTED,
                entity_type: "client",
                entity_id: Some(client_id),
                details: serde_json::json!({
                    "lead_id": lead_id,
                    "lead_name": lead.name,
                    "email": email,
                    "user_created": user_created,
                    "client_created": client_created,
                    "products_copied": products_copied,
                }),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(lead_id, user_id, client_id, user_created, client_created, "Lead converted");

        Ok(Some(ConvertedLead {
            lead_id,
            user_id,
            client_id,
            user_created,
            client_created,
            products_copied,
        }))
    }
}
