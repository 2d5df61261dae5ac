//! Database row types and their entity conversions

use almacen_common::{AuditInfo, UserId};
use almacen_errors::AppResult;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::entities::{
    AuditEntry, MovementDetail, Product, ProductSummary, StockLevel, StockLevelDetail, Supplier,
    SupplierSummary, User, UserRole, UserSummary, Warehouse, WarehouseSummary,
};
use crate::domain::movement_type::MovementType;
use crate::domain::repositories::MovementSummary;

/// Movement row joined with its master data
#[derive(Debug, FromRow)]
pub struct MovementDetailRow {
    pub id: i64,
    pub movement_type: String,
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
    pub created_at: DateTime<Utc>,
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub warehouse_code: String,
    pub warehouse_name: String,
    pub warehouse_dest_id: Option<Uuid>,
    pub warehouse_dest_code: Option<String>,
    pub warehouse_dest_name: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub supplier_code: Option<String>,
    pub supplier_name: Option<String>,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub created_by_display_name: Option<String>,
}

pub fn movement_detail_from_row(row: MovementDetailRow) -> AppResult<MovementDetail> {
    let warehouse_dest = match (
        row.warehouse_dest_id,
        row.warehouse_dest_code,
        row.warehouse_dest_name,
    ) {
        (Some(id), Some(code), Some(name)) => Some(WarehouseSummary { id, code, name }),
        _ => None,
    };
    let supplier = match (row.supplier_id, row.supplier_code, row.supplier_name) {
        (Some(id), Some(code), Some(name)) => Some(SupplierSummary { id, code, name }),
        _ => None,
    };

    Ok(MovementDetail {
        id: row.id,
        movement_type: MovementType::parse(&row.movement_type)?,
        quantity: row.quantity,
        unit_cost: row.unit_cost,
        unit_price: row.unit_price,
        total_cost: row.total_cost,
        movement_date: row.movement_date,
        reference: row.reference,
        notes: row.notes,
        batch_code: row.batch_code,
        serial_numbers: row.serial_numbers,
        expiration_date: row.expiration_date,
        customer_id: row.customer_id,
        product: ProductSummary {
            id: row.product_id,
            sku: row.product_sku,
            name: row.product_name,
        },
        warehouse: WarehouseSummary {
            id: row.warehouse_id,
            code: row.warehouse_code,
            name: row.warehouse_name,
        },
        warehouse_dest,
        supplier,
        created_by: UserSummary {
            id: row.created_by,
            username: row.created_by_username,
            display_name: row.created_by_display_name,
        },
        created_at: row.created_at,
    })
}

#[derive(Debug, FromRow)]
pub struct MovementSummaryRow {
    pub movement_type: String,
    pub count: i64,
    pub total_quantity: i64,
    pub total_value: Decimal,
}

pub fn movement_summary_from_row(row: MovementSummaryRow) -> AppResult<MovementSummary> {
    Ok(MovementSummary {
        movement_type: MovementType::parse(&row.movement_type)?,
        count: row.count,
        total_quantity: row.total_quantity,
        total_value: row.total_value,
    })
}

#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            sku: row.sku,
            name: row.name,
            category: row.category,
            unit_cost: row.unit_cost,
            active: row.active,
            audit: audit_info(
                row.created_at,
                row.created_by,
                row.updated_at,
                row.updated_by,
            ),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct WarehouseRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub location: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        Warehouse {
            id: row.id,
            code: row.code,
            name: row.name,
            location: row.location,
            active: row.active,
            audit: audit_info(
                row.created_at,
                row.created_by,
                row.updated_at,
                row.updated_by,
            ),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SupplierRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            code: row.code,
            name: row.name,
            email: row.email,
            phone: row.phone,
            audit: audit_info(
                row.created_at,
                row.created_by,
                row.updated_at,
                row.updated_by,
            ),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub fn user_from_row(row: UserRow) -> AppResult<User> {
    Ok(User {
        id: row.id,
        username: row.username,
        password_hash: row.password_hash,
        display_name: row.display_name,
        role: UserRole::parse(&row.role)?,
        active: row.active,
        created_at: row.created_at,
    })
}

#[derive(Debug, FromRow)]
pub struct StockLevelRow {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub stock: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<StockLevelRow> for StockLevel {
    fn from(row: StockLevelRow) -> Self {
        StockLevel {
            product_id: row.product_id,
            warehouse_id: row.warehouse_id,
            stock: row.stock,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct StockLevelDetailRow {
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub warehouse_code: String,
    pub warehouse_name: String,
    pub stock: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<StockLevelDetailRow> for StockLevelDetail {
    fn from(row: StockLevelDetailRow) -> Self {
        StockLevelDetail {
            product_id: row.product_id,
            product_sku: row.product_sku,
            product_name: row.product_name,
            warehouse_id: row.warehouse_id,
            warehouse_code: row.warehouse_code,
            warehouse_name: row.warehouse_name,
            stock: row.stock,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct AuditEntryRow {
    pub id: i64,
    pub user_id: Uuid,
    pub action: String,
    pub entity: String,
    pub entity_id: String,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntryRow> for AuditEntry {
    fn from(row: AuditEntryRow) -> Self {
        AuditEntry {
            id: row.id,
            user_id: row.user_id,
            action: row.action,
            entity: row.entity,
            entity_id: row.entity_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

fn audit_info(
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
) -> AuditInfo {
    AuditInfo {
        created_at,
        created_by: created_by.map(UserId::from_uuid),
        updated_at,
        updated_by: updated_by.map(UserId::from_uuid),
    }
}
