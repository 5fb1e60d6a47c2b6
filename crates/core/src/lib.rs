//! Domain logic for the Nexus ERP backend.
//!
//! Nothing in this crate touches the network or the database: it holds the
//! role/permission table, status vocabularies, validation helpers and the
//! small amount of arithmetic behind the analytics endpoints.

pub mod analytics;
pub mod claim;
pub mod credentials;
pub mod error;
pub mod lead;
pub mod pagination;
pub mod product;
pub mod roles;
pub mod types;
pub mod user;
pub mod validation;
