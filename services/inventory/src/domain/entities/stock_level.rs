//! Derived stock projection

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Running total for one (product, warehouse) pair
///
/// Purely derived from the movement ledger; never edited directly.
#[derive(Debug, Clone, Serialize)]
pub struct StockLevel {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub stock: i64,
    pub updated_at: DateTime<Utc>,
}

/// Stock row joined with product and warehouse names for listings
#[derive(Debug, Clone, Serialize)]
pub struct StockLevelDetail {
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub warehouse_code: String,
    pub warehouse_name: String,
    pub stock: i64,
    pub updated_at: DateTime<Utc>,
}
