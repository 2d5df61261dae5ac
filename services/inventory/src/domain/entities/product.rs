//! Product master data

use almacen_common::AuditInfo;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
