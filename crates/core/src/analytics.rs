//! Arithmetic behind the dashboard and analytics endpoints.

use serde::Serialize;

use crate::lead::LeadStatus;

/// Number of leads sitting in one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: i64,
}

/// Expand sparse `(status, count)` rows from a `GROUP BY` into one entry per
/// pipeline stage, in pipeline order, filling gaps with zero.
///
/// Rows with an unrecognised status are ignored.
pub fn fill_status_counts(rows: &[(String, i64)]) -> Vec<StatusCount> {
    LeadStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: rows
                .iter()
                .filter(|(s, _)| s == status.as_str())
                .map(|(_, c)| *c)
                .sum(),
        })
        .collect()
}

/// Share of prospects that became clients, as a percentage with one decimal.
///
/// `open_leads` are leads still in the pipeline; converted leads no longer
/// exist as rows, so clients stand in for them. Returns `0.0` when there is
/// nothing to measure.
pub fn conversion_rate(clients: i64, open_leads: i64) -> f64 {
    let total = clients + open_leads;
    if total <= 0 {
        return 0.0;
    }
    let pct = clients as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}
