//! Movement endpoints

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
use crate::application::commands::CreateMovementCommand;
use crate::application::queries::{MovementListQuery, SummaryQuery};
use crate::domain::entities::MovementDetail;
use crate::domain::repositories::MovementSummary;
use crate::state::AppState;

use super::PageParams;

pub async fn create_movement(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(cmd): Json<CreateMovementCommand>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MovementDetail>>)> {
    require_permission(&claims.0, "inventory:write")?;
    let user = claims.user_id()?;

    let detail = state.movements.create_movement(cmd, user).await?;
    Ok(ApiResponse::created(detail, "movement recorded"))
}

pub async fn list_movements(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(query): Query<MovementListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResult<MovementDetail>>>> {
    require_permission(&claims.0, "inventory:read")?;

    let page = state.movements.list_movements(&query).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get_movement(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MovementDetail>>> {
    require_permission(&claims.0, "inventory:read")?;

    let detail = state.movements.get_movement(id).await?;
    Ok(ApiResponse::ok(detail))
}

pub async fn list_movements_for_product(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(product_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<PagedResult<MovementDetail>>>> {
    require_permission(&claims.0, "inventory:read")?;

    let page = state
        .movements
        .list_movements_for_product(product_id, params.pagination())
        .await?;
    Ok(ApiResponse::ok(page))
}

pub async fn movement_summary(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<ApiResponse<Vec<MovementSummary>>>> {
    require_permission(&claims.0, "inventory:read")?;

    let summary = state.movements.movement_summary(&query).await?;
    Ok(ApiResponse::ok(summary))
}
