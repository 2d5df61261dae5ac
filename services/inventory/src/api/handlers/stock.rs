//! Stock projection endpoints

use almacen_auth_core::require_permission;
use almacen_common::PagedResult;
use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::middleware::AuthClaims;
use crate::api::{ApiResponse, ApiResult};
use crate::application::queries::StockListQuery;
use crate::domain::entities::StockLevelDetail;
use crate::state::AppState;

pub async fn list_stock(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(query): Query<StockListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResult<StockLevelDetail>>>> {
    require_permission(&claims.0, "inventory:read")?;

    let page = state.movements.list_stock(&query).await?;
    Ok(ApiResponse::ok(page))
}
