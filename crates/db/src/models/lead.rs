//! Lead entity model and DTOs.

use nexus_core::lead::LeadStatus;
use nexus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::comment::Comment;
use crate::models::product::Product;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub operator_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// Parsed pipeline status. The `CHECK` constraint on `leads.status`
    /// guarantees a known value, so unparseable text falls back to `NEW`.
    pub fn pipeline_status(&self) -> LeadStatus {
        self.status.parse().unwrap_or_default()
    }
}

/// Lead with the products it is interested in and its comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct LeadDetail {
    #[serde(flatten)]
    pub lead: Lead,
    pub products: Vec<Product>,
    pub comments: Vec<Comment>,
}

/// DTO for creating a new lead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub operator_id: Option<DbId>,
}

/// DTO for updating an existing lead. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub operator_id: Option<DbId>,
}

/// Filter for lead listings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeadFilter {
    /// Restrict to leads assigned to this operator.
    pub operator_id: Option<DbId>,
    pub status: Option<LeadStatus>,
}
