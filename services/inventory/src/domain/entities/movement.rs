//! Inventory movement ledger entry

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use almacen_common::UserId;

use crate::domain::movement_type::MovementType;

/// A validated movement ready for insertion
///
/// Ledger entries are immutable: there is no update form of this type and
/// no repository method to modify or delete a row once written.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub movement_type: MovementType,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    /// Only ever set for transfers; forced to None otherwise
    pub warehouse_dest_id: Option<Uuid>,
    pub quantity: i64,
    pub unit_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub movement_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub batch_code: Option<String>,
    pub serial_numbers: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub created_by: UserId,
}

/// Ledger valuation: |quantity| x unit cost, rounded to 2 decimals
///
/// `unit_price` never participates in valuation.
pub fn total_cost(quantity: i64, unit_cost: Option<Decimal>) -> Option<Decimal> {
    unit_cost.map(|cost| (Decimal::from(quantity.unsigned_abs()) * cost).round_dp(2))
}

/// A movement enriched with its related master data, as returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct MovementDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub unit_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub movement_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub batch_code: Option<String>,
    pub serial_numbers: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub product: ProductSummary,
    pub warehouse: WarehouseSummary,
    pub warehouse_dest: Option<WarehouseSummary>,
    pub supplier: Option<SupplierSummary>,
    pub created_by: UserSummary,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WarehouseSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
}
