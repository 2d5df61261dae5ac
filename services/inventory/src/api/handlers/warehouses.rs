//! Warehouse endpoints

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
use crate::application::commands::{CreateWarehouseCommand, UpdateWarehouseCommand};
use crate::domain::entities::Warehouse;
use crate::state::AppState;

use super::PageParams;

pub async fn create_warehouse(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(cmd): Json<CreateWarehouseCommand>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Warehouse>>)> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    let warehouse = state.catalog.create_warehouse(cmd, user).await?;
    Ok(ApiResponse::created(warehouse, "warehouse created"))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Warehouse>>> {
    require_permission(&claims.0, "catalog:read")?;

    let warehouse = state.catalog.get_warehouse(id).await?;
    Ok(ApiResponse::ok(warehouse))
}

pub async fn update_warehouse(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
    Json(cmd): Json<UpdateWarehouseCommand>,
) -> ApiResult<Json<ApiResponse<Warehouse>>> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    let warehouse = state.catalog.update_warehouse(id, cmd, user).await?;
    Ok(ApiResponse::with_message(warehouse, "warehouse updated"))
}

pub async fn delete_warehouse(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_permission(&claims.0, "catalog:write")?;
    let user = claims.user_id()?;

    state.catalog.delete_warehouse(id, user).await?;
    Ok(ApiResponse::with_message((), "warehouse deleted"))
}

pub async fn list_warehouses(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<PagedResult<Warehouse>>>> {
    require_permission(&claims.0, "catalog:read")?;

    let page = state.catalog.list_warehouses(params.pagination()).await?;
    Ok(ApiResponse::ok(page))
}
