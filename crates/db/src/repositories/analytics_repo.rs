//! Aggregate queries behind the analytics endpoints.

use nexus_core::analytics::{conversion_rate, fill_status_counts};
use nexus_core::claim::ClaimStatus;
use sqlx::PgPool;

use crate::models::analytics::{AnalyticsSummary, IncomeBreakdownRow};

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// One row per client with the summed price of its products, highest
    /// income first. Clients without products report zero.
    pub async fn income_breakdown(pool: &PgPool) -> Result<Vec<IncomeBreakdownRow>, sqlx::Error> {
        sqlx::query_as::<_, IncomeBreakdownRow>(
            "SELECT c.id AS client_id,
                    u.name,
                    u.email,
                    COALESCE(SUM(p.price), 0)::DOUBLE PRECISION AS total_income,
                    COUNT(p.id) AS number_of_products
             FROM clients c
             JOIN users u ON u.id = c.user_id
             LEFT JOIN client_products cp ON cp.client_id = c.id
             LEFT JOIN products p ON p.id = cp.product_id
             GROUP BY c.id, u.name, u.email
             ORDER BY total_income DESC, c.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Dashboard headline numbers.
    pub async fn summary(pool: &PgPool) -> Result<AnalyticsSummary, sqlx::Error> {
        let status_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM leads GROUP BY status")
                .fetch_all(pool)
                .await?;
        let leads_by_status = fill_status_counts(&status_rows);
        let total_leads: i64 = leads_by_status.iter().map(|s| s.count).sum();
        let open_leads: i64 = leads_by_status
            .iter()
            .filter(|s| s.status.is_open())
            .map(|s| s.count)
            .sum();

        let (total_clients, total_products, open_claims, total_revenue): (i64, i64, i64, f64) =
            sqlx::query_as(
                "SELECT
                    (SELECT COUNT(*) FROM clients),
                    (SELECT COUNT(*) FROM products),
                    (SELECT COUNT(*) FROM claims WHERE status <> $1),
                    (SELECT COALESCE(SUM(p.price), 0)::DOUBLE PRECISION
                       FROM client_products cp
                       JOIN products p ON p.id = cp.product_id)",
            )
            .bind(ClaimStatus::Resolved.as_str())
            .fetch_one(pool)
            .await?;

        Ok(AnalyticsSummary {
            total_leads,
            leads_by_status,
            total_clients,
            total_products,
            open_claims,
            total_revenue,
            conversion_rate: conversion_rate(total_clients, open_leads),
        })
    }
}
