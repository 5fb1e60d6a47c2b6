//! Dashboard and analytics read models.

use axum::extract::State;
use axum::Json;
use nexus_db::models::analytics::{AnalyticsSummary, IncomeBreakdownRow};
use nexus_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAnalytics, RequireDashboard};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/analytics/income-breakdown
///
/// One row per client, highest total income first.
pub async fn income_breakdown(
    State(state): State<AppState>,
    RequireAnalytics(_user): RequireAnalytics,
) -> AppResult<Json<DataResponse<Vec<IncomeBreakdownRow>>>> {
    let rows = AnalyticsRepo::income_breakdown(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/analytics/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireDashboard(_user): RequireDashboard,
) -> AppResult<Json<DataResponse<AnalyticsSummary>>> {
    let summary = AnalyticsRepo::summary(&state.pool).await?;
    Ok(Json(DataResponse { data: summary }))
}
