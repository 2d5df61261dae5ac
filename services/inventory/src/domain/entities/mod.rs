pub mod audit_entry;
pub mod movement;
pub mod product;
pub mod stock_level;
pub mod supplier;
pub mod user;
pub mod warehouse;

pub use audit_entry::{AuditEntry, NewAuditEntry};
pub use movement::{
    total_cost, MovementDetail, NewMovement, ProductSummary, SupplierSummary, UserSummary,
    WarehouseSummary,
};
pub use product::Product;
pub use stock_level::{StockLevel, StockLevelDetail};
pub use supplier::Supplier;
pub use user::{User, UserRole};
pub use warehouse::Warehouse;
