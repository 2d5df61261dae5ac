pub mod catalog_commands;
pub mod movement_commands;

pub use catalog_commands::{
    CreateProductCommand, CreateSupplierCommand, CreateWarehouseCommand, UpdateProductCommand,
    UpdateSupplierCommand, UpdateWarehouseCommand,
};
pub use movement_commands::{CreateMovementCommand, MovementInput};
