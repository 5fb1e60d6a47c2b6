//! Claim entity model and DTOs.

use nexus_core::claim::ClaimStatus;
use nexus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::attachment::Attachment;
use crate::models::comment::Comment;

/// A row from the `claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Claim {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub client_id: DbId,
    pub operator_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Claim with its comments and attachments.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimDetail {
    #[serde(flatten)]
    pub claim: Claim,
    pub comments: Vec<Comment>,
    pub attachments: Vec<Attachment>,
}

/// DTO for creating a new claim.
#[derive(Debug, Clone)]
pub struct CreateClaim {
    pub title: String,
    pub description: String,
    pub client_id: DbId,
    pub operator_id: Option<DbId>,
    pub status: Option<ClaimStatus>,
}

/// DTO for updating an existing claim. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClaim {
    pub title: Option<String>,
    pub description: Option<String>,
    pub operator_id: Option<DbId>,
}

/// Which claims a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimScope {
    All,
    /// Claims assigned to this operator.
    Operator(DbId),
    /// Claims filed under this client profile.
    Client(DbId),
}

impl ClaimScope {
    /// Whether a claim falls inside this scope.
    pub fn includes(self, claim: &Claim) -> bool {
        match self {
            ClaimScope::All => true,
            ClaimScope::Operator(id) => claim.operator_id == Some(id),
            ClaimScope::Client(id) => claim.client_id == id,
        }
    }
}
