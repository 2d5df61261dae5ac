//! Master-data maintenance

use std::sync::Arc;

use almacen_common::{AuditInfo, PagedResult, Pagination, UserId};
use almacen_errors::{AppError, AppResult};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{NewAuditEntry, Product, Supplier, Warehouse};
use crate::domain::repositories::{
    AuditRepository, ProductRepository, SupplierRepository, WarehouseRepository,
};

use super::commands::{
    CreateProductCommand, CreateSupplierCommand, CreateWarehouseCommand, UpdateProductCommand,
    UpdateSupplierCommand, UpdateWarehouseCommand,
};

pub struct CatalogHandler {
    product_repo: Arc<dyn ProductRepository>,
    warehouse_repo: Arc<dyn WarehouseRepository>,
    supplier_repo: Arc<dyn SupplierRepository>,
    audit_repo: Arc<dyn AuditRepository>,
}

impl CatalogHandler {
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        warehouse_repo: Arc<dyn WarehouseRepository>,
        supplier_repo: Arc<dyn SupplierRepository>,
        audit_repo: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            product_repo,
            warehouse_repo,
            supplier_repo,
            audit_repo,
        }
    }

    // ========== Products ==========

    pub async fn create_product(
        &self,
        cmd: CreateProductCommand,
        user: UserId,
    ) -> AppResult<Product> {
        cmd.validate()?;

        if self.product_repo.exists_by_sku(&cmd.sku).await? {
            return Err(AppError::conflict(format!("sku {} already exists", cmd.sku)));
        }

        let product = Product {
            id: Uuid::now_v7(),
            sku: cmd.sku,
            name: cmd.name,
            category: cmd.category,
            unit_cost: cmd.unit_cost,
            active: true,
            audit: AuditInfo::new(Some(user)),
        };
        self.product_repo.save(&product).await?;

        info!(product_id = %product.id, sku = %product.sku, "product created");
        self.record_audit(user, "create", "product", product.id, json!({"sku": product.sku}))
            .await;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        cmd: UpdateProductCommand,
        user: UserId,
    ) -> AppResult<Product> {
        let mut product = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("product not found"))?;

        if let Some(name) = cmd.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name cannot be empty"));
            }
            product.name = name;
        }
        if let Some(category) = cmd.category {
            product.category = Some(category);
        }
        if let Some(unit_cost) = cmd.unit_cost {
            product.unit_cost = Some(unit_cost);
        }
        if let Some(active) = cmd.active {
            product.active = active;
        }
        product.audit.update(Some(user));

        self.product_repo.update(&product).await?;
        self.record_audit(user, "update", "product", id, json!({"sku": product.sku}))
            .await;
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid, user: UserId) -> AppResult<()> {
        self.product_repo.delete(id).await?;
        self.record_audit(user, "delete", "product", id, json!({})).await;
        Ok(())
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("product not found"))
    }

    pub async fn list_products(&self, pagination: Pagination) -> AppResult<PagedResult<Product>> {
        self.product_repo.list(pagination).await
    }

    // ========== Warehouses ==========

    pub async fn create_warehouse(
        &self,
        cmd: CreateWarehouseCommand,
        user: UserId,
    ) -> AppResult<Warehouse> {
        cmd.validate()?;

        let warehouse = Warehouse {
            id: Uuid::now_v7(),
            code: cmd.code,
            name: cmd.name,
            location: cmd.location,
            active: true,
            audit: AuditInfo::new(Some(user)),
        };
        self.warehouse_repo.save(&warehouse).await?;

        info!(warehouse_id = %warehouse.id, code = %warehouse.code, "warehouse created");
        self.record_audit(user, "create", "warehouse", warehouse.id, json!({"code": warehouse.code}))
            .await;
        Ok(warehouse)
    }

    pub async fn update_warehouse(
        &self,
        id: Uuid,
        cmd: UpdateWarehouseCommand,
        user: UserId,
    ) -> AppResult<Warehouse> {
        let mut warehouse = self
            .warehouse_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("warehouse not found"))?;

        if let Some(name) = cmd.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name cannot be empty"));
            }
            warehouse.name = name;
        }
        if let Some(location) = cmd.location {
            warehouse.location = Some(location);
        }
        if let Some(active) = cmd.active {
            warehouse.active = active;
        }
        warehouse.audit.update(Some(user));

        self.warehouse_repo.update(&warehouse).await?;
        self.record_audit(user, "update", "warehouse", id, json!({"code": warehouse.code}))
            .await;
        Ok(warehouse)
    }

    pub async fn delete_warehouse(&self, id: Uuid, user: UserId) -> AppResult<()> {
        self.warehouse_repo.delete(id).await?;
        self.record_audit(user, "delete", "warehouse", id, json!({})).await;
        Ok(())
    }

    pub async fn get_warehouse(&self, id: Uuid) -> AppResult<Warehouse> {
        self.warehouse_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("warehouse not found"))
    }

    pub async fn list_warehouses(
        &self,
        pagination: Pagination,
    ) -> AppResult<PagedResult<Warehouse>> {
        self.warehouse_repo.list(pagination).await
    }

    // ========== Suppliers ==========

    pub async fn create_supplier(
        &self,
        cmd: CreateSupplierCommand,
        user: UserId,
    ) -> AppResult<Supplier> {
        cmd.validate()?;

        let supplier = Supplier {
            id: Uuid::now_v7(),
            code: cmd.code,
            name: cmd.name,
            email: cmd.email,
            phone: cmd.phone,
            audit: AuditInfo::new(Some(user)),
        };
        self.supplier_repo.save(&supplier).await?;

        self.record_audit(user, "create", "supplier", supplier.id, json!({"code": supplier.code}))
            .await;
        Ok(supplier)
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        cmd: UpdateSupplierCommand,
        user: UserId,
    ) -> AppResult<Supplier> {
        let mut supplier = self
            .supplier_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("supplier not found"))?;

        if let Some(name) = cmd.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name cannot be empty"));
            }
            supplier.name = name;
        }
        if let Some(email) = cmd.email {
            supplier.email = Some(email);
        }
        if let Some(phone) = cmd.phone {
            supplier.phone = Some(phone);
        }
        supplier.audit.update(Some(user));

        self.supplier_repo.update(&supplier).await?;
        self.record_audit(user, "update", "supplier", id, json!({"code": supplier.code}))
            .await;
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: Uuid, user: UserId) -> AppResult<()> {
        self.supplier_repo.delete(id).await?;
        self.record_audit(user, "delete", "supplier", id, json!({})).await;
        Ok(())
    }

    pub async fn get_supplier(&self, id: Uuid) -> AppResult<Supplier> {
        self.supplier_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("supplier not found"))
    }

    pub async fn list_suppliers(
        &self,
        pagination: Pagination,
    ) -> AppResult<PagedResult<Supplier>> {
        self.supplier_repo.list(pagination).await
    }

    /// Best-effort audit write after the data change committed
    async fn record_audit(
        &self,
        user: UserId,
        action: &str,
        entity: &str,
        entity_id: Uuid,
        detail: serde_json::Value,
    ) {
        let entry = NewAuditEntry::new(user.0, action, entity, entity_id).with_detail(detail);
        if let Err(err) = self.audit_repo.record(&entry).await {
            tracing::warn!("audit write failed: {}", err);
        }
    }
}
