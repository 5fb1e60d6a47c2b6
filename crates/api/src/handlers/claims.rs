//! Handlers for the `/claims` resource.
//!
//! Visibility follows [`ClaimScope`]: staff with `EditAllClaims` see every
//! claim, operators see the claims assigned to them, and a CLIENT sees the
//! claims filed under their own client profile. A claim outside the caller's
//! scope is a 403.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nexus_core::claim::ClaimStatus;
use nexus_core::error::CoreError;
use nexus_core::roles::{Permission, Role};
use nexus_core::types::DbId;
use nexus_core::validation::validate_input;
use nexus_db::models::attachment::{Attachment, CreateAttachment};
use nexus_db::models::claim::{Claim, ClaimDetail, ClaimScope, CreateClaim, UpdateClaim};
use nexus_db::models::comment::{Comment, CommentParent, CreateComment};
use nexus_db::repositories::{AttachmentRepo, ClaimRepo, ClientRepo, CommentRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::leads::{CommentRequest, StatusRequest};
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "is required"))]
    pub description: String,
    /// Resolved from the caller when a CLIENT omits it.
    pub client_id: Option<DbId>,
    pub operator_id: Option<DbId>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClaimRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub description: Option<String>,
    pub operator_id: Option<DbId>,
}

/// Attachment metadata. The file itself lives wherever `url` points.
#[derive(Debug, Deserialize, Validate)]
pub struct AttachmentRequest {
    #[validate(length(min = 1, max = 255, message = "is required"))]
    pub file_name: String,
    #[validate(url(message = "must be a valid URL"))]
    pub url: String,
    #[validate(length(max = 100))]
    pub content_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

async fn scope_for(state: &AppState, user: &AuthUser) -> AppResult<ClaimScope> {
    user.require(Permission::AccessClaims)?;

    if user.can(Permission::EditAllClaims) {
        return Ok(ClaimScope::All);
    }
    if user.role == Role::Client {
        let client = ClientRepo::find_by_user_id(&state.pool, user.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("No client profile for this account"))?;
        return Ok(ClaimScope::Client(client.id));
    }
    Ok(ClaimScope::Operator(user.user_id))
}

/// Load a claim inside the caller's scope.
async fn load_claim(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Claim> {
    let scope = scope_for(state, user).await?;
    let claim = ClaimRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Claim", id))?;

    if !scope.includes(&claim) {
        return Err(AppError::forbidden("You do not have access to this claim"));
    }
    Ok(claim)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/claims
pub async fn list_claims(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Claim>>>> {
    let scope = scope_for(&state, &auth).await?;
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ClaimStatus>)
        .transpose()?;
    let (limit, offset) = params.resolve();

    let claims = ClaimRepo::list(&state.pool, scope, status, limit, offset).await?;
    Ok(Json(DataResponse { data: claims }))
}

/// POST /api/claims
///
/// A CLIENT files claims against their own profile only and cannot pick the
/// operator. An operator filing a claim is assigned to it by default.
pub async fn create_claim(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateClaimRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Claim>>)> {
    validate_input(&input)?;
    let scope = scope_for(&state, &auth).await?;

    let (client_id, operator_id) = match scope {
        ClaimScope::Client(own) => {
            if input.client_id.is_some_and(|id| id != own) {
                return Err(AppError::forbidden("Clients can only file claims for themselves"));
            }
            (own, None)
        }
        ClaimScope::Operator(operator) => {
            let client_id = input.client_id.ok_or_else(|| {
                AppError::Core(CoreError::Validation("client_id is required".into()))
            })?;
            (client_id, Some(input.operator_id.unwrap_or(operator)))
        }
        ClaimScope::All => {
            let client_id = input.client_id.ok_or_else(|| {
                AppError::Core(CoreError::Validation("client_id is required".into()))
            })?;
            (client_id, input.operator_id)
        }
    };

    let claim = ClaimRepo::create(
        &state.pool,
        &CreateClaim {
            title: input.title,
            description: input.description,
            client_id,
            operator_id,
            status: None,
        },
    )
    .await?;

    tracing::info!(claim_id = claim.id, client_id, created_by = auth.user_id, "Claim created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: claim })))
}

/// GET /api/claims/{id}
pub async fn get_claim(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClaimDetail>>> {
    let claim = load_claim(&state, &auth, id).await?;
    let comments = CommentRepo::list_for_claim(&state.pool, id).await?;
    let attachments = AttachmentRepo::list_for_claim(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ClaimDetail {
            claim,
            comments,
            attachments,
        },
    }))
}

/// PATCH /api/claims/{id}
pub async fn update_claim(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClaimRequest>,
) -> AppResult<Json<DataResponse<Claim>>> {
    validate_input(&input)?;
    load_claim(&state, &auth, id).await?;

    if input.operator_id.is_some() && !auth.can(Permission::EditAllClaims) {
        return Err(AppError::forbidden("Only supervisors can reassign claims"));
    }

    let dto = UpdateClaim {
        title: input.title,
        description: input.description,
        operator_id: input.operator_id,
    };
    let claim = ClaimRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or(AppError::not_found("Claim", id))?;
    Ok(Json(DataResponse { data: claim }))
}

/// PATCH /api/claims/{id}/status
pub async fn update_claim_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Claim>>> {
    if auth.role == Role::Client {
        return Err(AppError::forbidden("Clients cannot change claim status"));
    }
    let status: ClaimStatus = input.status.parse()?;
    load_claim(&state, &auth, id).await?;

    let claim = ClaimRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::not_found("Claim", id))?;

    tracing::info!(claim_id = id, status = %status, changed_by = auth.user_id, "Claim status changed");
    Ok(Json(DataResponse { data: claim }))
}

/// DELETE /api/claims/{id}
pub async fn delete_claim(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(Permission::DeleteClaims)?;

    if ClaimRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Claim", id))
    }
}

/// POST /api/claims/{id}/comments
pub async fn add_claim_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    validate_input(&input)?;
    load_claim(&state, &auth, id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            content: input.content,
            user_id: auth.user_id,
            parent: CommentParent::Claim(id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// POST /api/claims/{id}/attachments
pub async fn add_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AttachmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Attachment>>)> {
    validate_input(&input)?;
    load_claim(&state, &auth, id).await?;

    let attachment = AttachmentRepo::create(
        &state.pool,
        &CreateAttachment {
            claim_id: id,
            file_name: input.file_name,
            url: input.url,
            content_type: input.content_type,
            uploaded_by: Some(auth.user_id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: attachment })))
}
