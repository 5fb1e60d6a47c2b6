//! Handlers for the `/products` catalogue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nexus_core::product::{validate_metadata, validate_price};
use nexus_core::roles::Permission;
use nexus_core::types::DbId;
use nexus_core::validation::validate_input;
use nexus_db::models::product::{CreateProduct, Product, UpdateProduct};
use nexus_db::repositories::ProductRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireManageProducts, RequirePropertyAccess};
use crate::query::resolve_page;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub product_type: Option<String>,
    pub price: f64,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub product_type: Option<String>,
    pub price: Option<f64>,
    pub metadata: Option<serde_json::Value>,
}

fn check_fields(price: Option<f64>, metadata: Option<&serde_json::Value>) -> AppResult<()> {
    if let Some(price) = price {
        validate_price(price)?;
    }
    if let Some(metadata) = metadata {
        validate_metadata(metadata)?;
    }
    Ok(())
}

/// GET /api/products[?type=]
pub async fn list_products(
    State(state): State<AppState>,
    RequirePropertyAccess(_user): RequirePropertyAccess,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let (limit, offset) = resolve_page(params.limit, params.offset);
    let products =
        ProductRepo::list(&state.pool, params.product_type.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    RequirePropertyAccess(_user): RequirePropertyAccess,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Product", id))?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    RequireManageProducts(user): RequireManageProducts,
    Json(input): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    validate_input(&input)?;
    check_fields(Some(input.price), input.metadata.as_ref())?;

    let dto = CreateProduct {
        name: input.name,
        product_type: input.product_type,
        price: input.price,
        metadata: input.metadata,
    };
    let product = ProductRepo::create(&state.pool, &dto).await?;

    tracing::info!(product_id = product.id, created_by = user.user_id, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PATCH /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    RequireManageProducts(_user): RequireManageProducts,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProductRequest>,
) -> AppResult<Json<DataResponse<Product>>> {
    validate_input(&input)?;
    check_fields(input.price, input.metadata.as_ref())?;

    let dto = UpdateProduct {
        name: input.name,
        product_type: input.product_type,
        price: input.price,
        metadata: input.metadata,
    };
    let product = ProductRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or(AppError::not_found("Product", id))?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/products/{id}
///
/// Also drops the product from every lead and client it was linked to.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireManageProducts(user): RequireManageProducts,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(Permission::DeleteProducts)?;

    if ProductRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Product", id))
    }
}
