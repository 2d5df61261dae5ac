//! almacen-adapter-postgres - PostgreSQL access layer
//!
//! Pool creation, transaction management and embedded migrations.

pub mod connection;
pub mod migration;
pub mod transaction;

pub use connection::{check_connection, create_pool, PostgresConfig};
pub use migration::{Migration, MigrationManager, MigrationResult};
pub use transaction::TransactionManager;
