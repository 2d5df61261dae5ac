//! Warehouse master data

use almacen_common::AuditInfo;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub location: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
