//! Repository for the `clients` and `client_products` tables.

use nexus_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::client::{Client, ClientProduct, ClientSummary};
use crate::models::product::Product;
use crate::models::user::{CreateUser, User};
use crate::repositories::user_repo;

const COLUMNS: &str = "id, user_id, created_at, updated_at";

/// Client profile joined with user contact fields.
const SUMMARY_SELECT: &str = "SELECT c.id, c.user_id, u.name, u.email, u.phone, c.created_at
                              FROM clients c
                              JOIN users u ON u.id = c.user_id";

/// Provides CRUD operations for client profiles and their product assignments.
pub struct ClientRepo;

impl ClientRepo {
    /// Create a user and its client profile atomically.
    pub async fn create_with_user(
        pool: &PgPool,
        input: &CreateUser,
    ) -> Result<(User, Client), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = user_repo::insert(&mut *tx, input).await?;

        let query = format!("INSERT INTO clients (user_id) VALUES ($1) RETURNING {COLUMNS}");
        let client = sqlx::query_as::<_, Client>(&query)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((user, client))
    }

    /// Find a client profile by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the client profile owned by a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE user_id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Client with contact details.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClientSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, ClientSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients, newest first. `user_id` restricts the list to one owner.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ClientSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE ($1::BIGINT IS NULL OR c.user_id = $1)
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ClientSummary>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a client profile with its claims (and their comments and
    /// attachments) and product assignments. The owning user is kept.
    ///
    /// Returns `true` if the client existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let deleted = Self::delete_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Cleanup shared by client and user deletion.
    pub(crate) async fn delete_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        for statement in [
            "DELETE FROM comments WHERE claim_id IN (SELECT id FROM claims WHERE client_id = $1)",
            "DELETE FROM attachments WHERE claim_id IN (SELECT id FROM claims WHERE client_id = $1)",
            "DELETE FROM claims WHERE client_id = $1",
            "DELETE FROM client_products WHERE client_id = $1",
        ] {
            sqlx::query(statement).bind(id).execute(&mut **tx).await?;
        }
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign a product to a client. A duplicate pair violates
    /// `uq_client_products_client_product`.
    pub async fn assign_product(
        pool: &PgPool,
        client_id: DbId,
        product_id: DbId,
    ) -> Result<ClientProduct, sqlx::Error> {
        sqlx::query_as::<_, ClientProduct>(
            "INSERT INTO client_products (client_id, product_id) VALUES ($1, $2)
             RETURNING id, client_id, product_id, created_at, updated_at",
        )
        .bind(client_id)
        .bind(product_id)
        .fetch_one(pool)
        .await
    }

    /// Remove a product assignment. Returns `true` if it existed.
    pub async fn unassign_product(
        pool: &PgPool,
        client_id: DbId,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM client_products WHERE client_id = $1 AND product_id = $2")
                .bind(client_id)
                .bind(product_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Products assigned to a client.
    pub async fn list_products(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT p.id, p.name, p.product_type, p.price, p.metadata, p.created_at, p.updated_at
             FROM products p
             JOIN client_products cp ON cp.product_id = p.id
             WHERE cp.client_id = $1
             ORDER BY p.name, p.id",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
    }
}
