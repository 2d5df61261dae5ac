//! Product endpoints

use almacen_auth_core::require_permission;
use almacen_common::PagedResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::middleware::AuthClaims;
use crate::api::{ApiResponse, ApiResult};
use crate::application::commands::{CreateProductCommand, UpdateProductCommand};
use crate::domain::entities::Product;
use crate::state::AppState;

use super::PageParams;

pub async fn create_product(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(cmd): Json<CreateProductCommand>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    let product = state.catalog.create_product(cmd, user).await?;
    Ok(ApiResponse::created(product, "product created"))
}

pub async fn get_product(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    require_permission(&claims.0, "catalog:read")?;

    let product = state.catalog.get_product(id).await?;
    Ok(ApiResponse::ok(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
    Json(cmd): Json<UpdateProductCommand>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    let product = state.catalog.update_product(id, cmd, user).await?;
    Ok(ApiResponse::with_message(product, "product updated"))
}

pub async fn delete_product(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    state.catalog.delete_product(id, user).await?;
    Ok(ApiResponse::with_message((), "product deleted"))
}

pub async fn list_products(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<PagedResult<Product>>>> {
    require_permission(&claims.0, "catalog:read")?;

    let page = state.catalog.list_products(params.pagination()).await?;
    Ok(ApiResponse::ok(page))
}
