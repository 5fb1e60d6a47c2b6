use nexus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One audit trail entry. `details` holds action-specific JSON.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    /// `None` for actions run outside a user session (CLI, seed).
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A new entry. Actions and entity types are fixed names like
/// `lead.status_changed` and `lead`.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<DbId>,
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}
