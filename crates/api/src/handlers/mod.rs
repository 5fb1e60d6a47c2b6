//! HTTP handlers, one module per resource.

pub mod analytics;
pub mod auth;
pub mod claims;
pub mod clients;
pub mod leads;
pub mod products;
pub mod users;
