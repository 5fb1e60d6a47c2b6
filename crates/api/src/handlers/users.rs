//! Handlers for the `/users` resource.
//!
//! Listing and creation need `ManageUsers`; who may create which role is
//! decided by [`can_create_role`]. Users may always read and edit themselves.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nexus_core::roles::{can_create_role, Permission, Role};
use nexus_core::types::DbId;
use nexus_core::user::{validate_password_strength, validate_theme};
use nexus_core::validation::{normalize_email, validate_input};
use nexus_db::models::user::{CreateUser, UpdateUser, UserResponse};
use nexus_db::repositories::{ClientRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManageUsers;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /users`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub role: String,
    pub supervisor_id: Option<DbId>,
}

/// Request body for `PATCH /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub role: Option<String>,
    pub supervisor_id: Option<DbId>,
    pub theme: Option<String>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
}

/// Request body for `PATCH /users/{id}/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireManageUsers(_user): RequireManageUsers,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let role_id = params
        .role
        .as_deref()
        .map(Role::from_name)
        .transpose()?
        .map(Role::id);
    let (limit, offset) = crate::query::resolve_page(params.limit, params.offset);

    let users = UserRepo::list(&state.pool, role_id, limit, offset).await?;
    let data = users
        .into_iter()
        .map(UserResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse { data }))
}

/// POST /api/users
///
/// New CLIENT users get their client profile in the same transaction.
pub async fn create_user(
    State(state): State<AppState>,
    RequireManageUsers(actor): RequireManageUsers,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_input(&input)?;
    let role = Role::from_name(&input.role)?;
    if !can_create_role(actor.role, role) {
        return Err(AppError::forbidden(format!(
            "{} cannot create {role} users",
            actor.role
        )));
    }
    validate_password_strength(&input.password)?;

    let dto = CreateUser {
        email: normalize_email(&input.email),
        password_hash: hash_password(&input.password)?,
        name: input.name,
        phone: input.phone,
        role_id: role.id(),
        supervisor_id: input.supervisor_id,
    };

    let user = if role == Role::Client {
        ClientRepo::create_with_user(&state.pool, &dto).await?.0
    } else {
        UserRepo::create(&state.pool, &dto).await?
    };

    tracing::info!(user_id = user.id, role = %role, created_by = actor.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::try_from(user)?,
        }),
    ))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if auth.user_id != id {
        auth.require(Permission::ManageUsers)?;
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    Ok(Json(DataResponse {
        data: UserResponse::try_from(user)?,
    }))
}

/// PATCH /api/users/{id}
///
/// Users edit their own profile and preferences. Only an ADMIN edits other
/// users, and only an ADMIN changes roles or supervisors.
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_input(&input)?;
    let is_admin = auth.role == Role::Admin;
    if auth.user_id != id && !is_admin {
        return Err(AppError::forbidden("You can only edit your own profile"));
    }
    if !is_admin && (input.role.is_some() || input.supervisor_id.is_some()) {
        return Err(AppError::forbidden("Only an ADMIN can change roles or supervisors"));
    }

    let role_id = match input.role.as_deref() {
        Some(name) => {
            let role = Role::from_name(name)?;
            if !can_create_role(auth.role, role) {
                return Err(AppError::forbidden(format!(
                    "Cannot assign the {role} role"
                )));
            }
            Some(role.id())
        }
        None => None,
    };
    if let Some(theme) = input.theme.as_deref() {
        validate_theme(theme)?;
    }

    let dto = UpdateUser {
        email: input.email.as_deref().map(normalize_email),
        name: input.name,
        phone: input.phone,
        role_id,
        supervisor_id: input.supervisor_id,
        theme: input.theme,
        email_notifications: input.email_notifications,
        push_notifications: input.push_notifications,
        sms_notifications: input.sms_notifications,
    };

    let user = UserRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    Ok(Json(DataResponse {
        data: UserResponse::try_from(user)?,
    }))
}

/// PATCH /api/users/{id}/password
///
/// Self-service password change. The current password must be supplied.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    if auth.user_id != id {
        return Err(AppError::forbidden("You can only change your own password"));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    if !verify_password(&input.current_password, &user.password_hash)? {
        return Err(AppError::unauthorized("Current password is incorrect"));
    }
    validate_password_strength(&input.new_password)?;

    UserRepo::update_password(&state.pool, id, &hash_password(&input.new_password)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/{id}
///
/// Removes the user and cleans up everything that references them.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(Permission::DeleteUsers)?;
    if auth.user_id == id {
        return Err(AppError::BadRequest("You cannot delete your own account".into()));
    }

    if UserRepo::delete_with_dependents(&state.pool, id).await? {
        tracing::info!(user_id = id, deleted_by = auth.user_id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("User", id))
    }
}
