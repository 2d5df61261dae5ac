//! Shared application state

use std::sync::Arc;

use almacen_adapter_postgres::TransactionManager;
use almacen_auth_core::TokenService;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use crate::application::{AuthHandler, CatalogHandler, MovementHandler};
use crate::infrastructure::persistence::{
    PostgresAuditRepository, PostgresMovementRepository, PostgresProductRepository,
    PostgresStockRepository, PostgresSupplierRepository, PostgresUserRepository,
    PostgresWarehouseRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub movements: Arc<MovementHandler>,
    pub catalog: Arc<CatalogHandler>,
    pub auth: Arc<AuthHandler>,
    pub token_service: Arc<TokenService>,
    pub metrics_handle: PrometheusHandle,
    pub pool: PgPool,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        token_service: Arc<TokenService>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        let movement_repo = Arc::new(PostgresMovementRepository::new(pool.clone()));
        let stock_repo = Arc::new(PostgresStockRepository::new(pool.clone()));
        let product_repo = Arc::new(PostgresProductRepository::new(pool.clone()));
        let warehouse_repo = Arc::new(PostgresWarehouseRepository::new(pool.clone()));
        let supplier_repo = Arc::new(PostgresSupplierRepository::new(pool.clone()));
        let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
        let audit_repo = Arc::new(PostgresAuditRepository::new(pool.clone()));

        let movements = Arc::new(MovementHandler::new(
            TransactionManager::new(pool.clone()),
            movement_repo,
            stock_repo,
            product_repo.clone(),
            warehouse_repo.clone(),
            audit_repo.clone(),
        ));
        let catalog = Arc::new(CatalogHandler::new(
            product_repo,
            warehouse_repo,
            supplier_repo,
            audit_repo,
        ));
        let auth = Arc::new(AuthHandler::new(user_repo, token_service.clone()));

        Self {
            movements,
            catalog,
            auth,
            token_service,
            metrics_handle,
            pool,
        }
    }
}
