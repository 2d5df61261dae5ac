//! Master-data commands

use almacen_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductCommand {
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub unit_cost: Option<Decimal>,
}

impl CreateProductCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.sku.trim().is_empty() {
            return Err(AppError::validation("sku cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductCommand {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWarehouseCommand {
    pub code: String,
    pub name: String,
    pub location: Option<String>,
}

impl CreateWarehouseCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("code cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWarehouseCommand {
    pub name: Option<String>,
    pub location: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplierCommand {
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CreateSupplierCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("code cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSupplierCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
