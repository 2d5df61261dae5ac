//! inventory-api - warehouse inventory service
//!
//! An append-only movement ledger (entrada / salida / transferencia /
//! ajuste) with a derived per-warehouse stock projection, plus the master
//! data and authentication around it.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod state;
