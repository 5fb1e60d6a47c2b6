//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Deletes that must clean up
//! dependent rows run inside a single transaction.

pub mod activity_log_repo;
pub mod analytics_repo;
pub mod attachment_repo;
pub mod claim_repo;
pub mod client_repo;
pub mod comment_repo;
pub mod lead_repo;
pub mod product_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use analytics_repo::AnalyticsRepo;
pub use attachment_repo::AttachmentRepo;
pub use claim_repo::ClaimRepo;
pub use client_repo::ClientRepo;
pub use comment_repo::CommentRepo;
pub use lead_repo::LeadRepo;
pub use product_repo::ProductRepo;
pub use user_repo::UserRepo;
