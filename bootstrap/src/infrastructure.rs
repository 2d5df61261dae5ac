//! Shared infrastructure resources

use std::sync::Arc;

use almacen_adapter_postgres::{create_pool, PostgresConfig};
use almacen_auth_core::TokenService;
use almacen_config::AppConfig;
use almacen_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{with_retry, RetryConfig};

/// Infrastructure resource container
///
/// Owns everything with process lifetime: configuration, the database pool
/// and the token service. Constructed once at startup, dropped at shutdown.
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
}

impl Infrastructure {
    /// Build all resources from configuration, retrying connections
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_retry(&retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            "PostgreSQL connection pool created (max_connections: {})",
            config.database.max_connections
        );

        let token_service = Arc::new(TokenService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.expires_in as i64,
            config.jwt.refresh_expires_in as i64,
            "almacen-iam".to_string(),
            "almacen-api".to_string(),
        ));

        Ok(Self {
            config,
            postgres_pool,
            token_service,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }

    pub fn server_config(&self) -> &almacen_config::ServerConfig {
        &self.config.server
    }
}
