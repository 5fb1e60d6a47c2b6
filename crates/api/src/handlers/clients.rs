//! Handlers for the `/clients` resource and client product assignments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nexus_core::credentials::generate_temporary_password;
use nexus_core::roles::{Permission, Role};
use nexus_core::types::DbId;
use nexus_core::user::validate_password_strength;
use nexus_core::validation::{normalize_email, validate_input};
use nexus_db::models::client::{ClientDetail, ClientProduct, ClientSummary};
use nexus_db::models::user::CreateUser;
use nexus_db::repositories::{ClientRepo, ProductRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireManageClients, RequireManageProducts};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /clients`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Generated when omitted.
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedClient {
    #[serde(flatten)]
    pub client: ClientSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignProductRequest {
    pub product_id: DbId,
}

fn not_found(id: DbId) -> AppError {
    AppError::not_found("Client", id)
}

/// GET /api/clients
///
/// A CLIENT only ever gets their own profile back.
pub async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ClientSummary>>>> {
    let owner = if auth.role == Role::Client {
        Some(auth.user_id)
    } else {
        auth.require(Permission::AccessClients)?;
        None
    };
    let (limit, offset) = params.resolve();

    let clients = ClientRepo::list(&state.pool, owner, limit, offset).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    RequireManageClients(actor): RequireManageClients,
    Json(input): Json<CreateClientRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedClient>>)> {
    validate_input(&input)?;

    let (password, temporary_password) = match input.password {
        Some(password) => {
            validate_password_strength(&password)?;
            (password, None)
        }
        None => {
            let generated = generate_temporary_password();
            (generated.clone(), Some(generated))
        }
    };

    let dto = CreateUser {
        email: normalize_email(&input.email),
        password_hash: hash_password(&password)?,
        name: Some(input.name),
        phone: input.phone,
        role_id: Role::Client.id(),
        supervisor_id: None,
    };
    let (_, client) = ClientRepo::create_with_user(&state.pool, &dto).await?;

    let summary = ClientRepo::find_summary(&state.pool, client.id)
        .await?
        .ok_or_else(|| not_found(client.id))?;

    tracing::info!(client_id = client.id, created_by = actor.user_id, "Client created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedClient {
                client: summary,
                temporary_password,
            },
        }),
    ))
}

/// GET /api/clients/{id}
///
/// Without `AccessClients` the caller may only read their own profile, and
/// is refused before the id is looked up.
pub async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientDetail>>> {
    if !auth.can(Permission::AccessClients) {
        let own = ClientRepo::find_by_user_id(&state.pool, auth.user_id).await?;
        if own.map(|c| c.id) != Some(id) {
            return Err(AppError::forbidden("You can only view your own client profile"));
        }
    }

    let client = ClientRepo::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let products = ClientRepo::list_products(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ClientDetail { client, products },
    }))
}

/// DELETE /api/clients/{id}
///
/// Removes the profile with its claims and product assignments. The user
/// account stays.
pub async fn delete_client(
    State(state): State<AppState>,
    RequireManageClients(actor): RequireManageClients,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ClientRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(client_id = id, deleted_by = actor.user_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/clients/{id}/products
pub async fn assign_product(
    State(state): State<AppState>,
    RequireManageProducts(_user): RequireManageProducts,
    Path(id): Path<DbId>,
    Json(input): Json<AssignProductRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ClientProduct>>)> {
    if ClientRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    if ProductRepo::find_by_id(&state.pool, input.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Product", input.product_id));
    }

    let link = ClientRepo::assign_product(&state.pool, id, input.product_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// DELETE /api/clients/{id}/products/{product_id}
pub async fn unassign_product(
    State(state): State<AppState>,
    RequireManageProducts(_user): RequireManageProducts,
    Path((id, product_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ClientRepo::unassign_product(&state.pool, id, product_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ClientProduct", product_id))
    }
}
