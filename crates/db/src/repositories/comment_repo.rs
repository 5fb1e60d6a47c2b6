//! Repository for the `comments` table.

use nexus_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentParent, CreateComment};

const COLUMNS: &str = "id, content, user_id, lead_id, claim_id, created_at, updated_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Attach a comment to a lead or a claim.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let (lead_id, claim_id) = match input.parent {
            CommentParent::Lead(id) => (Some(id), None),
            CommentParent::Claim(id) => (None, Some(id)),
        };
        let query = format!(
            "INSERT INTO comments (content, user_id, lead_id, claim_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.content)
            .bind(input.user_id)
            .bind(lead_id)
            .bind(claim_id)
            .fetch_one(pool)
            .await
    }

    /// Comments on a lead, oldest first.
    pub async fn list_for_lead(pool: &PgPool, lead_id: DbId) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE lead_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(lead_id)
            .fetch_all(pool)
            .await
    }

    /// Comments on a claim, oldest first.
    pub async fn list_for_claim(
        pool: &PgPool,
        claim_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE claim_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(claim_id)
            .fetch_all(pool)
            .await
    }
}
