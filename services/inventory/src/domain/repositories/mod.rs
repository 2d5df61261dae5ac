pub mod audit_repository;
pub mod movement_repository;
pub mod stock_repository;
pub mod supplier_repository;
pub mod product_repository;
pub mod user_repository;
pub mod warehouse_repository;

pub use audit_repository::{AuditFilter, AuditRepository};
pub use movement_repository::{MovementFilter, MovementRepository, MovementSummary};
pub use stock_repository::{StockFilter, StockRepository};
pub use supplier_repository::SupplierRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
pub use warehouse_repository::WarehouseRepository;
