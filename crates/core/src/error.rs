//! Domain failures, free of any HTTP or database types. The API crate maps
//! each variant to a status code.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input the caller can fix. The message is shown to them as-is.
    #[error("invalid input: {0}")]
    Validation(String),

    /// No usable credentials.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role or ownership does not allow it.
    #[error("not allowed: {0}")]
    Forbidden(String),

    /// Data that should be impossible, such as an unknown role id.
    #[error("{0}")]
    Internal(String),
}
