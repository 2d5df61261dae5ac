//! Audit trail endpoints

use almacen_auth_core::require_permission;
use almacen_common::PagedResult;
use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::middleware::AuthClaims;
use crate::api::{ApiResponse, ApiResult};
use crate::application::queries::AuditListQuery;
use crate::domain::entities::AuditEntry;
use crate::state::AppState;

pub async fn list_audit(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(query): Query<AuditListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResult<AuditEntry>>>> {
    require_permission(&claims.0, "audit:read")?;

    let page = state.movements.list_audit(&query).await?;
    Ok(ApiResponse::ok(page))
}
