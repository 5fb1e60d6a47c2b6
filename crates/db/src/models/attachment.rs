//! Attachment metadata model and DTO.

use nexus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attachments` table. The file itself lives at `url`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub claim_id: DbId,
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateAttachment {
    pub claim_id: DbId,
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub uploaded_by: Option<DbId>,
}
