//! The [`AuthUser`] extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nexus_core::roles::{has_permission, require_permission, Permission, Role};
use nexus_core::types::DbId;

use crate::auth::cookie::token_from_headers;
use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The caller, as stated by a valid session token.
///
/// Taking `AuthUser` as a handler argument makes the route require a login;
/// a missing, forged or expired token is rejected with 401 before the
/// handler runs. Role checks are then explicit:
///
/// ```ignore
/// async fn handler(user: AuthUser) -> AppResult<StatusCode> {
///     user.require(Permission::DeleteLeads)?;
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn can(&self, permission: Permission) -> bool {
        has_permission(self.role, permission)
    }

    /// 403 unless the role holds `permission`.
    pub fn require(&self, permission: Permission) -> AppResult<()> {
        Ok(require_permission(self.role, permission)?)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let Some(token) = token_from_headers(&parts.headers) else {
            return Err(AppError::unauthorized("Authentication required"));
        };

        match validate_token(&token, &state.config.jwt) {
            Ok(claims) => Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                role: claims.role,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                Err(AppError::unauthorized("Invalid or expired token"))
            }
        }
    }
}
