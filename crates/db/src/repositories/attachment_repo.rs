//! Repository for the `attachments` table.

use nexus_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::{Attachment, CreateAttachment};

const COLUMNS: &str =
    "id, claim_id, file_name, url, content_type, uploaded_by, created_at, updated_at";

pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Register attachment metadata for a claim.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttachment,
    ) -> Result<Attachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO attachments (claim_id, file_name, url, content_type, uploaded_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(input.claim_id)
            .bind(&input.file_name)
            .bind(&input.url)
            .bind(&input.content_type)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_claim(
        pool: &PgPool,
        claim_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attachments WHERE claim_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(claim_id)
            .fetch_all(pool)
            .await
    }
}
