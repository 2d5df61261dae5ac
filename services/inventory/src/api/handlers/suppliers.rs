//! Supplier endpoints

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
use crate::application::commands::{CreateSupplierCommand, UpdateSupplierCommand};
use crate::domain::entities::Supplier;
use crate::state::AppState;

use super::PageParams;

pub async fn create_supplier(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(cmd): Json<CreateSupplierCommand>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Supplier>>)> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    let supplier = state.catalog.create_supplier(cmd, user).await?;
    Ok(ApiResponse::created(supplier, "supplier created"))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Supplier>>> {
    require_permission(&claims.0, "catalog:read")?;

    let supplier = state.catalog.get_supplier(id).await?;
    Ok(ApiResponse::ok(supplier))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
    Json(cmd): Json<UpdateSupplierCommand>,
) -> ApiResult<Json<ApiResponse<Supplier>>> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    let supplier = state.catalog.update_supplier(id, cmd, user).await?;
    Ok(ApiResponse::with_message(supplier, "supplier updated"))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    state.catalog.delete_supplier(id, user).await?;
    Ok(ApiResponse::with_message((), "supplier deleted"))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<PagedResult<Supplier>>>> {
    require_permission(&claims.0, "catalog:read")?;

    let page = state.catalog.list_suppliers(params.pagination()).await?;
    Ok(ApiResponse::ok(page))
}
