//! Product entity model and DTOs.

use nexus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub product_type: String,
    pub price: f64,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub product_type: Option<String>,
    pub price: f64,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for updating an existing product. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub price: Option<f64>,
    pub metadata: Option<serde_json::Value>,
}
