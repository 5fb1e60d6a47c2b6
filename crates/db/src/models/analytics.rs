//! Analytics read models.

use nexus_core::analytics::StatusCount;
use nexus_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Income attributed to one client: the summed price of its products.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IncomeBreakdownRow {
    pub client_id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub total_income: f64,
    pub number_of_products: i64,
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_leads: i64,
    pub leads_by_status: Vec<StatusCount>,
    pub total_clients: i64,
    pub total_products: i64,
    pub open_claims: i64,
    pub total_revenue: f64,
    pub conversion_rate: f64,
}
