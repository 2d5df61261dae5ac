//! Supplier master data

use almacen_common::AuditInfo;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Supplier {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
