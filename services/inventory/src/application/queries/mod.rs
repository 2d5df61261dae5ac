pub mod movement_queries;

pub use movement_queries::{AuditListQuery, MovementListQuery, StockListQuery, SummaryQuery};
