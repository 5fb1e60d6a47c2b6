//! Lead conversion result.

use nexus_core::types::DbId;
use serde::Serialize;

/// Outcome of converting a WON lead into a client.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedLead {
    pub lead_id: DbId,
    pub user_id: DbId,
    pub client_id: DbId,
    pub user_created: bool,
    pub client_created: bool,
    pub products_copied: u64,
}
