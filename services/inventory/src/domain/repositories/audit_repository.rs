//! Audit trail repository

use almacen_common::{PagedResult, Pagination};
use almacen_errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{AuditEntry, NewAuditEntry};

/// Filter criteria for browsing the audit trail
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Records an entry inside an open transaction so that the audit row
    /// commits or rolls back together with the business write
    async fn record_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        entry: &NewAuditEntry,
    ) -> AppResult<()>;

    /// Records an entry on its own connection, for writes that already committed
    async fn record(&self, entry: &NewAuditEntry) -> AppResult<()>;

    async fn list(
        &self,
        filter: &AuditFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<AuditEntry>>;
}
