//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use nexus_core::roles::{default_route, permission_set, PermissionSet};
use nexus_core::validation::{normalize_email, validate_input};
use nexus_db::models::user::{User, UserResponse};
use nexus_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{removal_cookie, session_cookie};
use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Consecutive bad passwords that lock an account.
const MAX_FAILED_ATTEMPTS: i32 = 5;
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// The signed-in user with what they may see.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub permissions: PermissionSet,
    pub default_route: &'static str,
}

impl TryFrom<User> for SessionResponse {
    type Error = AppError;

    fn try_from(user: User) -> AppResult<Self> {
        let user = UserResponse::try_from(user)?;
        Ok(Self {
            permissions: permission_set(user.role),
            default_route: default_route(user.role),
            user,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Sets the `token` cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    validate_input(&input)?;
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(AppError::forbidden("Account is temporarily locked. Try again later."));
    }

    if !verify_password(&input.password, &user.password_hash)? {
        let lock_until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
        let failed =
            UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_ATTEMPTS, lock_until)
                .await?;
        if failed >= MAX_FAILED_ATTEMPTS {
            tracing::warn!(user_id = user.id, failed, "Account locked after failed logins");
        }
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let role = user.role()?;
    let token = generate_token(user.id, &user.email, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %role, "User logged in");

    let jar = jar.add(session_cookie(token, &state.config.jwt));
    Ok((jar, Json(SessionResponse::try_from(user)?)))
}

/// POST /api/auth/logout
///
/// Clear the session cookie. Tokens are stateless, so there is nothing to revoke.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.add(removal_cookie(&state.config.jwt)),
        StatusCode::NO_CONTENT,
    )
}

/// GET /api/auth/me
///
/// The current user, their permission row, and their landing page.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<SessionResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    Ok(Json(SessionResponse::try_from(user)?))
}
