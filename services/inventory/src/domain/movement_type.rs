//! Movement types and the stock projection rule

use almacen_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of inventory movement
///
/// The wire names are the Spanish terms the application has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Inbound receipt
    Entrada,
    /// Outbound issue
    Salida,
    /// Warehouse-to-warehouse transfer
    Transferencia,
    /// Absolute stock adjustment; quantity is a target value, not a delta
    Ajuste,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Salida => "salida",
            Self::Transferencia => "transferencia",
            Self::Ajuste => "ajuste",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "entrada" => Ok(Self::Entrada),
            "salida" => Ok(Self::Salida),
            "transferencia" => Ok(Self::Transferencia),
            "ajuste" => Ok(Self::Ajuste),
            other => Err(AppError::validation(format!(
                "invalid movement type: {}",
                other
            ))),
        }
    }

    /// Whether this type takes stock out of the origin warehouse
    pub fn is_outbound(&self) -> bool {
        matches!(self, Self::Salida | Self::Transferencia)
    }

    /// Whether this type requires a destination warehouse
    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transferencia)
    }

    /// Project a ledger entry onto the stock running totals
    ///
    /// Returns the changes to apply, in application order. The caller must
    /// have validated the entry first; a transfer without a destination is
    /// a programming error here, not a user error.
    pub fn stock_changes(
        &self,
        warehouse_id: Uuid,
        warehouse_dest_id: Option<Uuid>,
        quantity: i64,
    ) -> AppResult<Vec<StockChange>> {
        match self {
            Self::Entrada => Ok(vec![StockChange::Delta {
                warehouse_id,
                delta: quantity,
            }]),
            Self::Salida => Ok(vec![StockChange::Delta {
                warehouse_id,
                delta: -quantity,
            }]),
            Self::Transferencia => {
                let dest = warehouse_dest_id.ok_or_else(|| {
                    AppError::internal("transfer projected without a destination warehouse")
                })?;
                Ok(vec![
                    StockChange::Delta {
                        warehouse_id,
                        delta: -quantity,
                    },
                    StockChange::Delta {
                        warehouse_id: dest,
                        delta: quantity,
                    },
                ])
            }
            // The one case where quantity is an absolute target, not a delta.
            Self::Ajuste => Ok(vec![StockChange::Set {
                warehouse_id,
                value: quantity,
            }]),
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One change to a (product, warehouse) running total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// Add `delta` to the total, creating the row at `delta` if absent
    Delta { warehouse_id: Uuid, delta: i64 },
    /// Overwrite the total with `value`, creating the row if absent
    Set { warehouse_id: Uuid, value: i64 },
}

impl StockChange {
    pub fn warehouse_id(&self) -> Uuid {
        match self {
            Self::Delta { warehouse_id, .. } | Self::Set { warehouse_id, .. } => *warehouse_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn wh(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    /// In-memory fold of changes, mirroring what the repository SQL does
    fn apply_all(levels: &mut HashMap<Uuid, i64>, changes: &[StockChange]) {
        for change in changes {
            match change {
                StockChange::Delta {
                    warehouse_id,
                    delta,
                } => {
                    *levels.entry(*warehouse_id).or_insert(0) += delta;
                }
                StockChange::Set {
                    warehouse_id,
                    value,
                } => {
                    levels.insert(*warehouse_id, *value);
                }
            }
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(MovementType::Entrada.as_str(), "entrada");
        assert_eq!(MovementType::parse("transferencia").unwrap(), MovementType::Transferencia);
        assert!(MovementType::parse("devolucion").is_err());

        let json = serde_json::to_string(&MovementType::Ajuste).unwrap();
        assert_eq!(json, "\"ajuste\"");
        let back: MovementType = serde_json::from_str("\"salida\"").unwrap();
        assert_eq!(back, MovementType::Salida);
    }

    #[test]
    fn test_entrada_adds() {
        let changes = MovementType::Entrada.stock_changes(wh(1), None, 20).unwrap();
        assert_eq!(
            changes,
            vec![StockChange::Delta {
                warehouse_id: wh(1),
                delta: 20
            }]
        );
    }

    #[test]
    fn test_salida_subtracts() {
        let changes = MovementType::Salida.stock_changes(wh(1), None, 5).unwrap();
        assert_eq!(
            changes,
            vec![StockChange::Delta {
                warehouse_id: wh(1),
                delta: -5
            }]
        );
    }

    #[test]
    fn test_transferencia_moves_between_warehouses() {
        let changes = MovementType::Transferencia
            .stock_changes(wh(1), Some(wh(2)), 8)
            .unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(
            changes[0],
            StockChange::Delta {
                warehouse_id: wh(1),
                delta: -8
            }
        );
        assert_eq!(
            changes[1],
            StockChange::Delta {
                warehouse_id: wh(2),
                delta: 8
            }
        );
    }

    #[test]
    fn test_transferencia_without_destination_is_internal_error() {
        let err = MovementType::Transferencia
            .stock_changes(wh(1), None, 8)
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_ajuste_overwrites() {
        let changes = MovementType::Ajuste.stock_changes(wh(1), None, 50).unwrap();
        assert_eq!(
            changes,
            vec![StockChange::Set {
                warehouse_id: wh(1),
                value: 50
            }]
        );
    }

    #[test]
    fn test_entrada_then_salida_round_trips() {
        let mut levels = HashMap::new();
        levels.insert(wh(1), 3);

        apply_all(
            &mut levels,
            &MovementType::Entrada.stock_changes(wh(1), None, 5).unwrap(),
        );
        apply_all(
            &mut levels,
            &MovementType::Salida.stock_changes(wh(1), None, 5).unwrap(),
        );

        assert_eq!(levels[&wh(1)], 3);
    }

    /// Worked scenario: receipt, transfer, then absolute adjustment
    #[test]
    fn test_receipt_transfer_adjust_scenario() {
        let mut levels = HashMap::new();

        apply_all(
            &mut levels,
            &MovementType::Entrada.stock_changes(wh(1), None, 20).unwrap(),
        );
        assert_eq!(levels[&wh(1)], 20);

        apply_all(
            &mut levels,
            &MovementType::Transferencia
                .stock_changes(wh(1), Some(wh(2)), 8)
                .unwrap(),
        );
        assert_eq!(levels[&wh(1)], 12);
        assert_eq!(levels[&wh(2)], 8);

        apply_all(
            &mut levels,
            &MovementType::Ajuste.stock_changes(wh(1), None, 50).unwrap(),
        );
        assert_eq!(levels[&wh(1)], 50);
        assert_eq!(levels[&wh(2)], 8);
    }
}
