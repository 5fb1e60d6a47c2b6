//! Permission-gated extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers whose role lacks one
//! [`Permission`]. Checks that depend on the target row (ownership,
//! assignment) stay in the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nexus_core::roles::Permission;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! permission_extractor {
    ($(#[$doc:meta])* $name:ident => $permission:ident) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                user.require(Permission::$permission)?;
                Ok($name(user))
            }
        }
    };
}

permission_extractor!(
    /// Dashboard summary numbers.
    RequireDashboard => AccessDashboard
);
permission_extractor!(
    /// Lead pipeline. Operators are further scoped to their own leads.
    RequireLeadAccess => AccessLeads
);
permission_extractor!(
    /// Product catalogue reads.
    RequirePropertyAccess => AccessProperties
);
permission_extractor!(RequireAnalytics => AccessAnalytics);
permission_extractor!(RequireManageUsers => ManageUsers);
permission_extractor!(
    /// Creating and deleting client profiles.
    RequireManageClients => ManageClients
);
permission_extractor!(
    /// Product writes and client product assignments.
    RequireManageProducts => ManageProducts
);
