//! Repository for the `claims` table.

use nexus_core::claim::ClaimStatus;
use nexus_core::types::DbId;
use sqlx::PgPool;

use crate::models::claim::{Claim, ClaimScope, CreateClaim, UpdateClaim};

const COLUMNS: &str =
    "id, title, description, status, client_id, operator_id, created_at, updated_at";

/// Provides CRUD operations for claims.
pub struct ClaimRepo;

impl ClaimRepo {
    /// Insert a new claim. Status defaults to `SUBMITTED`.
    pub async fn create(pool: &PgPool, input: &CreateClaim) -> Result<Claim, sqlx::Error> {
        let query = format!(
            "INSERT INTO claims (title, description, status, client_id, operator_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.unwrap_or(ClaimStatus::Submitted).as_str())
            .bind(input.client_id)
            .bind(input.operator_id)
            .fetch_one(pool)
            .await
    }

    /// Find a claim by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM claims WHERE id = $1");
        sqlx::query_as::<_, Claim>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the claims visible in `scope`, newest first.
    pub async fn list(
        pool: &PgPool,
        scope: ClaimScope,
        status: Option<ClaimStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Claim>, sqlx::Error> {
        let (operator_id, client_id) = match scope {
            ClaimScope::All => (None, None),
            ClaimScope::Operator(id) => (Some(id), None),
            ClaimScope::Client(id) => (None, Some(id)),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM claims
             WHERE ($1::BIGINT IS NULL OR operator_id = $1)
               AND ($2::BIGINT IS NULL OR client_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(operator_id)
            .bind(client_id)
            .bind(status.map(ClaimStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a claim. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClaim,
    ) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!(
            "UPDATE claims SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                operator_id = COALESCE($4, operator_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.operator_id)
            .fetch_optional(pool)
            .await
    }

    /// Set a claim's status. Any transition between known statuses is allowed.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ClaimStatus,
    ) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!("UPDATE claims SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Claim>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a claim with its comments and attachments.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE claim_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM attachments WHERE claim_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM claims WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
