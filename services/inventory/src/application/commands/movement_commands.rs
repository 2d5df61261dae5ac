//! Movement commands

use almacen_errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::movement_type::MovementType;

/// Raw movement submission as received from the caller
///
/// Required fields are `Option` so that an absent field can be reported
/// as a validation failure with a concrete message instead of a generic
/// deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovementCommand {
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub warehouse_dest_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub unit_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub movement_date: Option<DateTime<Utc>>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub batch_code: Option<String>,
    pub serial_numbers: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

/// The command's required fields after presence and basic shape checks
#[derive(Debug, Clone, Copy)]
pub struct MovementInput {
    pub movement_type: MovementType,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub warehouse_dest_id: Option<Uuid>,
    pub quantity: i64,
}

impl CreateMovementCommand {
    /// Field-level validation, before any repository access
    pub fn validate(&self) -> AppResult<MovementInput> {
        let movement_type = self
            .movement_type
            .as_deref()
            .ok_or_else(|| missing("type"))?;
        let movement_type = MovementType::parse(movement_type)?;
        let product_id = self.product_id.ok_or_else(|| missing("product_id"))?;
        let warehouse_id = self.warehouse_id.ok_or_else(|| missing("warehouse_id"))?;
        let quantity = self.quantity.ok_or_else(|| missing("quantity"))?;

        if quantity == 0 {
            return Err(AppError::validation("quantity cannot be zero"));
        }

        Ok(MovementInput {
            movement_type,
            product_id,
            warehouse_id,
            warehouse_dest_id: self.warehouse_dest_id,
            quantity,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::validation(format!("missing required field: {}", field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateMovementCommand {
        CreateMovementCommand {
            movement_type: Some("entrada".to_string()),
            product_id: Some(Uuid::now_v7()),
            warehouse_id: Some(Uuid::now_v7()),
            warehouse_dest_id: None,
            quantity: Some(5),
            unit_cost: None,
            unit_price: None,
            movement_date: None,
            reference: None,
            notes: None,
            batch_code: None,
            serial_numbers: None,
            expiration_date: None,
            customer_id: None,
            supplier_id: None,
        }
    }

    #[test]
    fn test_valid_command_passes() {
        let input = base_command().validate().unwrap();
        assert_eq!(input.movement_type, MovementType::Entrada);
        assert_eq!(input.quantity, 5);
    }

    #[test]
    fn test_missing_fields_rejected_by_name() {
        for (field, cmd) in [
            ("type", CreateMovementCommand {
                movement_type: None,
                ..base_command()
            }),
            ("product_id", CreateMovementCommand {
                product_id: None,
                ..base_command()
            }),
            ("warehouse_id", CreateMovementCommand {
                warehouse_id: None,
                ..base_command()
            }),
            ("quantity", CreateMovementCommand {
                quantity: None,
                ..base_command()
            }),
        ] {
            let err = cmd.validate().unwrap_err();
            assert_eq!(
                err.public_message(),
                format!("missing required field: {}", field)
            );
        }
    }

    #[test]
    fn test_zero_quantity_rejected_for_every_type() {
        for movement_type in ["entrada", "salida", "transferencia", "ajuste"] {
            let cmd = CreateMovementCommand {
                movement_type: Some(movement_type.to_string()),
                quantity: Some(0),
                ..base_command()
            };
            let err = cmd.validate().unwrap_err();
            assert_eq!(err.public_message(), "quantity cannot be zero");
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let cmd = CreateMovementCommand {
            movement_type: Some("devolucion".to_string()),
            ..base_command()
        };
        assert!(cmd.validate().is_err());
    }
}
