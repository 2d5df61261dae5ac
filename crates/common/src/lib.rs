//! almacen-common - shared types and utilities

pub mod types;
pub mod utils;

pub use types::*;
pub use utils::*;
