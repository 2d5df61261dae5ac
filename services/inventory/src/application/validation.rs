//! Movement validation
//!
//! The checks themselves are pure: the handler gathers a [`MovementContext`]
//! inside the write transaction (with the stock row locked) and the checks
//! run over that snapshot. Each failure is a hard rejection with no partial
//! effects, because the transaction rolls back on error.

use almacen_errors::{AppError, AppResult};

use super::commands::MovementInput;

/// Facts gathered from the database for one proposed movement
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementContext {
    pub product_exists: bool,
    pub warehouse_exists: bool,
    /// Only gathered when a destination was supplied
    pub dest_warehouse_exists: Option<bool>,
    /// Stock at (product, origin warehouse); 0 when no row exists
    pub available_stock: i64,
}

/// Run the rejection checks, in order
pub fn check(input: &MovementInput, ctx: &MovementContext) -> AppResult<()> {
    if !ctx.product_exists {
        return Err(AppError::not_found("product not found"));
    }
    if !ctx.warehouse_exists {
        return Err(AppError::not_found("warehouse not found"));
    }

    if input.movement_type.is_transfer() {
        let dest = input.warehouse_dest_id.ok_or_else(|| {
            AppError::validation("destination warehouse is required for transfers")
        })?;
        if dest == input.warehouse_id {
            return Err(AppError::validation(
                "destination warehouse must differ from origin",
            ));
        }
        if !ctx.dest_warehouse_exists.unwrap_or(false) {
            return Err(AppError::not_found("destination warehouse not found"));
        }
    }

    if input.movement_type.is_outbound() {
        let requested = input.quantity.unsigned_abs();
        if requested > ctx.available_stock.max(0).unsigned_abs() {
            return Err(AppError::validation(format!(
                "insufficient stock: requested {}, available {}",
                requested, ctx.available_stock
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::movement_type::MovementType;
    use uuid::Uuid;

    fn input(movement_type: MovementType, quantity: i64) -> MovementInput {
        MovementInput {
            movement_type,
            product_id: Uuid::now_v7(),
            warehouse_id: Uuid::now_v7(),
            warehouse_dest_id: None,
            quantity,
        }
    }

    fn ok_context() -> MovementContext {
        MovementContext {
            product_exists: true,
            warehouse_exists: true,
            dest_warehouse_exists: None,
            available_stock: 100,
        }
    }

    #[test]
    fn test_unknown_product_rejected_first() {
        let ctx = MovementContext {
            product_exists: false,
            warehouse_exists: false,
            ..ok_context()
        };
        let err = check(&input(MovementType::Entrada, 5), &ctx).unwrap_err();
        assert_eq!(err.public_message(), "product not found");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_unknown_warehouse_rejected() {
        let ctx = MovementContext {
            warehouse_exists: false,
            ..ok_context()
        };
        let err = check(&input(MovementType::Entrada, 5), &ctx).unwrap_err();
        assert_eq!(err.public_message(), "warehouse not found");
    }

    #[test]
    fn test_transfer_requires_destination() {
        let err = check(&input(MovementType::Transferencia, 5), &ok_context()).unwrap_err();
        assert_eq!(
            err.public_message(),
            "destination warehouse is required for transfers"
        );
    }

    #[test]
    fn test_transfer_destination_must_differ() {
        let mut movement = input(MovementType::Transferencia, 5);
        movement.warehouse_dest_id = Some(movement.warehouse_id);
        let err = check(&movement, &ok_context()).unwrap_err();
        assert_eq!(
            err.public_message(),
            "destination warehouse must differ from origin"
        );
    }

    #[test]
    fn test_transfer_destination_must_exist() {
        let mut movement = input(MovementType::Transferencia, 5);
        movement.warehouse_dest_id = Some(Uuid::now_v7());
        let ctx = MovementContext {
            dest_warehouse_exists: Some(false),
            ..ok_context()
        };
        let err = check(&movement, &ctx).unwrap_err();
        assert_eq!(err.public_message(), "destination warehouse not found");
    }

    #[test]
    fn test_insufficient_stock_reports_both_values() {
        let ctx = MovementContext {
            available_stock: 3,
            ..ok_context()
        };
        let err = check(&input(MovementType::Salida, 6), &ctx).unwrap_err();
        assert_eq!(
            err.public_message(),
            "insufficient stock: requested 6, available 3"
        );
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_outbound_at_exact_stock_passes() {
        let ctx = MovementContext {
            available_stock: 6,
            ..ok_context()
        };
        assert!(check(&input(MovementType::Salida, 6), &ctx).is_ok());
    }

    #[test]
    fn test_stock_check_uses_absolute_quantity() {
        let ctx = MovementContext {
            available_stock: 3,
            ..ok_context()
        };
        assert!(check(&input(MovementType::Salida, -6), &ctx).is_err());
    }

    #[test]
    fn test_inbound_ignores_stock() {
        let ctx = MovementContext {
            available_stock: 0,
            ..ok_context()
        };
        assert!(check(&input(MovementType::Entrada, 50), &ctx).is_ok());
        assert!(check(&input(MovementType::Ajuste, 50), &ctx).is_ok());
    }

    #[test]
    fn test_valid_transfer_passes() {
        let mut movement = input(MovementType::Transferencia, 5);
        movement.warehouse_dest_id = Some(Uuid::now_v7());
        let ctx = MovementContext {
            dest_warehouse_exists: Some(true),
            ..ok_context()
        };
        assert!(check(&movement, &ctx).is_ok());
    }
}
