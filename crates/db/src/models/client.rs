//! Client profile models.

use nexus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::product::Product;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A client joined with its user's contact details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientSummary {
    pub id: DbId,
    pub user_id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

/// Client detail view with assigned products.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: ClientSummary,
    pub products: Vec<Product>,
}

/// A row from the `client_products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientProduct {
    pub id: DbId,
    pub client_id: DbId,
    pub product_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
