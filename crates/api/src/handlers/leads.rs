//! Handlers for the `/leads` resource: CRUD, the kanban board, status moves,
//! comments, and conversion into a client.
//!
//! Roles without `ViewAllLeads` (operators) only see and work on leads
//! assigned to them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nexus_core::credentials::generate_temporary_password;
use nexus_core::lead::{group_into_columns, validate_convertible, KanbanColumn, LeadStatus};
use nexus_core::roles::Permission;
use nexus_core::types::DbId;
use nexus_core::validation::{normalize_email, validate_input};
use nexus_db::models::activity_log::NewActivity;
use nexus_db::models::comment::{Comment, CommentParent, CreateComment};
use nexus_db::models::conversion::ConvertedLead;
use nexus_db::models::lead::{CreateLead, Lead, LeadDetail, LeadFilter, UpdateLead};
use nexus_db::repositories::{ActivityLogRepo, CommentRepo, LeadRepo, ProductRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireLeadAccess;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /leads`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub status: Option<String>,
    pub operator_id: Option<DbId>,
    /// Products the lead is interested in.
    #[serde(default)]
    pub product_ids: Vec<DbId>,
}

/// Request body for `PATCH /leads/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLeadRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub status: Option<String>,
    pub operator_id: Option<DbId>,
    /// Additional products to link. Existing links are kept.
    #[serde(default)]
    pub product_ids: Vec<DbId>,
}

/// Request body for `PATCH /leads/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Request body for comment endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 5000, message = "must not be empty"))]
    pub content: String,
}

/// Response for `POST /leads/{id}/convert`.
#[derive(Debug, Serialize)]
pub struct ConvertLeadResponse {
    #[serde(flatten)]
    pub result: ConvertedLead,
    /// Only present when a new user account was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `Some(operator_id)` when the caller may only see their own leads.
fn operator_scope(user: &AuthUser) -> Option<DbId> {
    if user.can(Permission::ViewAllLeads) {
        None
    } else {
        Some(user.user_id)
    }
}

/// Load a lead the caller is allowed to work on.
async fn load_lead(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Lead> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;

    if let Some(operator_id) = operator_scope(user) {
        if lead.operator_id != Some(operator_id) {
            return Err(AppError::forbidden("This lead is not assigned to you"));
        }
    }
    Ok(lead)
}

fn parse_status(raw: Option<&str>) -> AppResult<Option<LeadStatus>> {
    Ok(raw.map(str::parse::<LeadStatus>).transpose()?)
}

/// 404 for the first unknown product. Runs before any lead write.
async fn ensure_products_exist(state: &AppState, product_ids: &[DbId]) -> AppResult<()> {
    for &product_id in product_ids {
        if ProductRepo::find_by_id(&state.pool, product_id).await?.is_none() {
            return Err(AppError::not_found("Product", product_id));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/leads
pub async fn list_leads(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let filter = LeadFilter {
        operator_id: operator_scope(&user),
        status: parse_status(params.status.as_deref())?,
    };
    let (limit, offset) = params.resolve();

    let leads = LeadRepo::list(&state.pool, filter, limit, offset).await?;
    Ok(Json(DataResponse { data: leads }))
}

/// GET /api/leads/board
///
/// Every pipeline column in order, each holding its leads.
pub async fn board(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
) -> AppResult<Json<DataResponse<Vec<KanbanColumn<Lead>>>>> {
    let leads = LeadRepo::list_for_board(&state.pool, operator_scope(&user)).await?;
    let columns = group_into_columns(leads, Lead::pipeline_status);
    Ok(Json(DataResponse { data: columns }))
}

/// POST /api/leads
///
/// Operators always own the leads they create.
pub async fn create_lead(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Json(input): Json<CreateLeadRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    validate_input(&input)?;

    let dto = CreateLead {
        name: input.name,
        email: normalize_email(&input.email),
        phone: input.phone,
        status: parse_status(input.status.as_deref())?,
        operator_id: operator_scope(&user).or(input.operator_id),
    };

    ensure_products_exist(&state, &input.product_ids).await?;
    let lead = LeadRepo::create_with_products(&state.pool, &dto, &input.product_ids).await?;

    tracing::info!(lead_id = lead.id, created_by = user.user_id, "Lead created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/leads/{id}
pub async fn get_lead(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LeadDetail>>> {
    let lead = load_lead(&state, &user, id).await?;
    let products = LeadRepo::list_products(&state.pool, id).await?;
    let comments = CommentRepo::list_for_lead(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: LeadDetail {
            lead,
            products,
            comments,
        },
    }))
}

/// PATCH /api/leads/{id}
pub async fn update_lead(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLeadRequest>,
) -> AppResult<Json<DataResponse<Lead>>> {
    validate_input(&input)?;
    load_lead(&state, &user, id).await?;

    if input.operator_id.is_some() && operator_scope(&user).is_some() {
        return Err(AppError::forbidden("Only supervisors can reassign leads"));
    }

    let dto = UpdateLead {
        name: input.name,
        email: input.email.as_deref().map(normalize_email),
        phone: input.phone,
        status: parse_status(input.status.as_deref())?,
        operator_id: input.operator_id,
    };

    ensure_products_exist(&state, &input.product_ids).await?;
    let lead = LeadRepo::update_with_products(&state.pool, id, &dto, &input.product_ids)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;

    Ok(Json(DataResponse { data: lead }))
}

/// PATCH /api/leads/{id}/status
///
/// The kanban move. Returns the updated lead so the board can confirm or
/// roll back its optimistic update.
pub async fn update_lead_status(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let status: LeadStatus = input.status.parse()?;
    let previous = load_lead(&state, &user, id).await?;

    let lead = LeadRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;

    if previous.status != lead.status {
        ActivityLogRepo::create(
            &state.pool,
            &NewActivity {
                user_id: Some(user.user_id),
                action: "lead.status_changed",
                entity_type: "lead",
                entity_id: Some(id),
                details: serde_json::json!({ "from": previous.status, "to": lead.status }),
            },
        )
        .await?;
    }

    tracing::debug!(lead_id = id, status = %status, "Lead moved");
    Ok(Json(DataResponse { data: lead }))
}

/// DELETE /api/leads/{id}
pub async fn delete_lead(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(Permission::DeleteLeads)?;

    if LeadRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Lead", id))
    }
}

/// POST /api/leads/{id}/convert
///
/// Turn a WON lead into a CLIENT user and client profile. A temporary
/// password is returned once, only when a new user was created.
pub async fn convert_lead(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ConvertLeadResponse>>> {
    let lead = load_lead(&state, &user, id).await?;
    validate_convertible(lead.pipeline_status())?;

    let temporary_password = generate_temporary_password();
    let password_hash = hash_password(&temporary_password)?;

    let result = LeadRepo::convert(&state.pool, id, &password_hash, Some(user.user_id))
        .await?
        .ok_or(AppError::not_found("Lead", id))?;

    let temporary_password = result.user_created.then_some(temporary_password);
    Ok(Json(DataResponse {
        data: ConvertLeadResponse {
            result,
            temporary_password,
        },
    }))
}

/// POST /api/leads/{id}/comments
pub async fn add_lead_comment(
    State(state): State<AppState>,
    RequireLeadAccess(user): RequireLeadAccess,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    validate_input(&input)?;
    load_lead(&state, &user, id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            content: input.content,
            user_id: user.user_id,
            parent: CommentParent::Lead(id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
