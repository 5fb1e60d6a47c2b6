//! Comment entity model and DTO.

use nexus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table. Exactly one of `lead_id` / `claim_id` is set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub content: String,
    pub user_id: DbId,
    pub lead_id: Option<DbId>,
    pub claim_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The entity a comment hangs off.
#[derive(Debug, Clone, Copy)]
pub enum CommentParent {
    Lead(DbId),
    Claim(DbId),
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub content: String,
    pub user_id: DbId,
    pub parent: CommentParent,
}
