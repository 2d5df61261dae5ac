//! Authentication middleware

use std::sync::Arc;

use almacen_auth_core::{Claims, TokenService};
use almacen_common::UserId;
use almacen_errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use super::response::ApiError;

/// Verified claims, injected by [`auth_middleware`]
pub struct AuthClaims(pub Claims);

impl AuthClaims {
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        self.0.user_id().map_err(Into::into)
    }
}

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| ApiError(AppError::unauthenticated("missing authentication")))
    }
}

/// Validates the bearer token and injects the claims into the request
///
/// Layered with the token service alone as its state, so the check does
/// not depend on the rest of the application wiring. Rejections render
/// the same error envelope as every other failure path.
pub async fn auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!("Missing or invalid authorization header");
        return Err(ApiError(AppError::unauthenticated("missing bearer token")));
    };

    debug!("Validating JWT token");
    match token_service.validate_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!(error = %e, "Token validation failed");
            Err(ApiError(AppError::unauthenticated(
                "invalid or expired token",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use almacen_auth_core::TokenService;
    use almacen_common::UserId;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use super::*;

    async fn handler(claims: AuthClaims) -> String {
        claims.0.sub
    }

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            "test_secret",
            3600,
            86400,
            "almacen-iam".to_string(),
            "almacen-api".to_string(),
        ))
    }

    fn router(token_service: Arc<TokenService>) -> Router {
        Router::new()
            .route("/", get(handler))
            .layer(middleware::from_fn_with_state(token_service, auth_middleware))
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let service = token_service();
        let user_id = UserId::new();
        let token = service
            .generate_access_token(&user_id, vec!["inventory:read".to_string()], vec![])
            .unwrap();

        let response = router(service)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_rejected_with_envelope() {
        let response = router(token_service())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["message"], serde_json::json!("missing bearer token"));
    }

    #[tokio::test]
    async fn test_refresh_token_rejected_as_access() {
        let service = token_service();
        let token = service.generate_refresh_token(&UserId::new()).unwrap();

        let response = router(service)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected_with_envelope() {
        let response = router(token_service())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Authorization", "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(
            body["message"],
            serde_json::json!("invalid or expired token")
        );
    }
}
