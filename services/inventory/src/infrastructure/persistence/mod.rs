pub mod postgres;
pub mod rows;

pub use postgres::{
    PostgresAuditRepository, PostgresMovementRepository, PostgresProductRepository,
    PostgresStockRepository, PostgresSupplierRepository, PostgresUserRepository,
    PostgresWarehouseRepository,
};
