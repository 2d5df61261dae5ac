//! HTTP surface tests over the full router
//!
//! Skipped unless `DATABASE_URL` is set.

use std::sync::Arc;

use almacen_adapter_postgres::MigrationManager;
use almacen_auth_core::TokenService;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use chrono::Utc;
use inventory_api::api::build_router;
use inventory_api::domain::entities::{User, UserRole};
use inventory_api::domain::password::HashedPassword;
use inventory_api::domain::repositories::UserRepository;
use inventory_api::infrastructure::migrations::migrations;
use inventory_api::infrastructure::persistence::PostgresUserRepository;
use inventory_api::state::AppState;

static MIGRATED: OnceCell<()> = OnceCell::const_new();
static METRICS: OnceCell<PrometheusHandle> = OnceCell::const_new();

async fn setup() -> Option<(Router, String)> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.expect("database connection");

    MIGRATED
        .get_or_init(|| {
            let pool = pool.clone();
            async move {
                MigrationManager::new(pool)
                    .migrate(&migrations())
                    .await
                    .expect("migrations");
            }
        })
        .await;

    let handle = METRICS
        .get_or_init(|| async { almacen_telemetry::init_metrics() })
        .await
        .clone();

    let token_service = Arc::new(TokenService::new(
        "api-test-secret",
        3600,
        86400,
        "almacen-iam".to_string(),
        "almacen-api".to_string(),
    ));

    let state = AppState::new(pool.clone(), token_service, handle);

    // seed_admin only fires on an empty table, so create the account directly.
    let username = format!("admin-{}", Uuid::now_v7().simple());
    let user = User {
        id: Uuid::now_v7(),
        username: username.clone(),
        password_hash: HashedPassword::from_plain("S3guro-pass")
            .unwrap()
            .as_str()
            .to_string(),
        display_name: None,
        role: UserRole::Admin,
        active: true,
        created_at: Utc::now(),
    };
    PostgresUserRepository::new(pool)
        .save(&user)
        .await
        .expect("seed admin");

    let router = build_router(state);

    // Log in through the API to exercise the whole auth path.
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({"username": username, "password": "S3guro-pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    Some((router, token))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_movement_endpoint_round_trip() {
    let Some((router, token)) = setup().await else { return };

    let tag = Uuid::now_v7().simple().to_string();

    let response = router
        .clone()
        .oneshot(authed_json_request(
            Method::POST,
            "/api/products",
            &token,
            json!({"sku": format!("API-{}", tag), "name": "Cable"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product = read_json(response).await;
    let product_id = product["data"]["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(authed_json_request(
            Method::POST,
            "/api/warehouses",
            &token,
            json!({"code": format!("WH-{}", tag), "name": "Central"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let warehouse = read_json(response).await;
    let warehouse_id = warehouse["data"]["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(authed_json_request(
            Method::POST,
            "/api/movements",
            &token,
            json!({
                "type": "entrada",
                "product_id": product_id,
                "warehouse_id": warehouse_id,
                "quantity": 20,
                "unit_cost": "10.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["type"], json!("entrada"));
    assert_eq!(body["data"]["total_cost"], json!("200.00"));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/stock?product_id={}", product_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["items"][0]["stock"], json!(20));
}

#[tokio::test]
async fn test_validation_error_shape() {
    let Some((router, token)) = setup().await else { return };

    let response = router
        .oneshot(authed_json_request(
            Method::POST,
            "/api/movements",
            &token,
            json!({
                "type": "entrada",
                "product_id": Uuid::now_v7(),
                "warehouse_id": Uuid::now_v7(),
                "quantity": 0,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("quantity cannot be zero"));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let Some((router, _token)) = setup().await else { return };

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/movements")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
