//! Authentication endpoints

use axum::{extract::State, Json};

use crate::api::middleware::AuthClaims;
use crate::api::{ApiResponse, ApiResult};
use crate::application::auth_handler::{LoginCommand, RefreshCommand, TokenPair};
use crate::domain::entities::User;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(cmd): Json<LoginCommand>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let tokens = state.auth.login(cmd).await?;
    Ok(ApiResponse::ok(tokens))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(cmd): Json<RefreshCommand>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let tokens = state.auth.refresh(cmd).await?;
    Ok(ApiResponse::ok(tokens))
}

pub async fn current_user(
    State(state): State<AppState>,
    claims: AuthClaims,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.auth.current_user(claims.user_id()?).await?;
    Ok(ApiResponse::ok(user))
}
