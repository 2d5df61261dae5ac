//! Business metrics

use metrics::counter;

use crate::domain::movement_type::MovementType;

pub fn record_movement_accepted(movement_type: MovementType) {
    let labels = [("type", movement_type.as_str().to_string())];
    counter!("inventory_movements_accepted_total", &labels).increment(1);
}

pub fn record_movement_rejected(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!("inventory_movements_rejected_total", &labels).increment(1);
}

pub fn record_login_attempt(success: bool) {
    let labels = [("success", success.to_string())];
    counter!("inventory_login_attempts_total", &labels).increment(1);
}
