//! Audit log entries

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One recorded action against the system
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub action: String,
    pub entity: String,
    pub entity_id: String,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// An entry waiting to be written
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: Uuid,
    pub action: String,
    pub entity: String,
    pub entity_id: String,
    pub detail: Option<serde_json::Value>,
}

impl NewAuditEntry {
    pub fn new(
        user_id: Uuid,
        action: impl Into<String>,
        entity: impl Into<String>,
        entity_id: impl ToString,
    ) -> Self {
        Self {
            user_id,
            action: action.into(),
            entity: entity.into(),
            entity_id: entity_id.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}
