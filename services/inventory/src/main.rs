//! inventory-api service entry point

use almacen_adapter_postgres::MigrationManager;
use almacen_bootstrap::{init_runtime, shutdown_signal, Infrastructure};
use almacen_config::AppConfig;
use almacen_telemetry::init_metrics;
use tracing::info;

use inventory_api::api::build_router;
use inventory_api::infrastructure::migrations::migrations;
use inventory_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    init_runtime(&config);
    let metrics_handle = init_metrics();

    info!("Initializing inventory-api...");
    let infra = Infrastructure::from_config(config).await?;

    let pool = infra.postgres_pool();
    let migration_result = MigrationManager::new(pool.clone())
        .migrate(&migrations())
        .await?;
    info!(
        applied = migration_result.applied_count(),
        "Migrations complete"
    );

    let state = AppState::new(pool, infra.token_service(), metrics_handle);

    // First boot on an empty database gets a usable admin account.
    let admin_user =
        std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let admin_password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "cambiame-ya".to_string());
    state.auth.seed_admin(&admin_user, &admin_password).await?;

    let app = build_router(state);

    let addr = format!(
        "{}:{}",
        infra.server_config().host,
        infra.server_config().port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("inventory-api listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("inventory-api stopped");
    Ok(())
}
