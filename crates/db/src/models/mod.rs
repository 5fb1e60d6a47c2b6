//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activity_log;
pub mod analytics;
pub mod attachment;
pub mod claim;
pub mod client;
pub mod comment;
pub mod conversion;
pub mod lead;
pub mod product;
pub mod user;
