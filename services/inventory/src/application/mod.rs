pub mod auth_handler;
pub mod catalog_handler;
pub mod commands;
pub mod handler;
pub mod metrics;
pub mod queries;
pub mod validation;

pub use auth_handler::AuthHandler;
pub use catalog_handler::CatalogHandler;
pub use handler::MovementHandler;
