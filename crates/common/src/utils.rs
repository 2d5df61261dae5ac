//! Small shared helpers

use uuid::Uuid;

/// New time-ordered UUID v7
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// New random UUID v4
pub fn random_id() -> Uuid {
    Uuid::new_v4()
}
