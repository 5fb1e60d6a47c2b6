//! Shared query parameter types for API handlers.

use nexus_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;

/// Clamped `(limit, offset)` pair ready for SQL.
pub fn resolve_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(offset),
    )
}

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn resolve(&self) -> (i64, i64) {
        resolve_page(self.limit, self.offset)
    }
}

/// Pagination plus a textual `status` filter (`?status=&limit=&offset=`).
///
/// The status stays a string here and is parsed by the handler, so an
/// unknown value produces a JSON `VALIDATION_ERROR` rather than a bare 400.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl StatusFilterParams {
    pub fn resolve(&self) -> (i64, i64) {
        resolve_page(self.limit, self.offset)
    }
}
