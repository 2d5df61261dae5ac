//! Route table

use axum::{
    middleware,
    routing::get,
    routing::post,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{audit, auth, movements, products, stock, suppliers, system, warehouses};
use super::middleware::auth_middleware;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::current_user))
        .route(
            "/api/movements",
            post(movements::create_movement).get(movements::list_movements),
        )
        .route("/api/movements/summary", get(movements::movement_summary))
        .route(
            "/api/movements/product/{product_id}",
            get(movements::list_movements_for_product),
        )
        .route("/api/movements/{id}", get(movements::get_movement))
        .route("/api/stock", get(stock::list_stock))
        .route(
            "/api/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/warehouses",
            post(warehouses::create_warehouse).get(warehouses::list_warehouses),
        )
        .route(
            "/api/warehouses/{id}",
            get(warehouses::get_warehouse)
                .put(warehouses::update_warehouse)
                .delete(warehouses::delete_warehouse),
        )
        .route(
            "/api/suppliers",
            post(suppliers::create_supplier).get(suppliers::list_suppliers),
        )
        .route(
            "/api/suppliers/{id}",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route("/api/audit", get(audit::list_audit))
        .layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
