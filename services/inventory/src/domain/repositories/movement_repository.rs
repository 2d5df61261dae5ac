//! Movement ledger repository

use almacen_common::{PagedResult, Pagination};
use almacen_errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{MovementDetail, NewMovement};
use crate::domain::movement_type::MovementType;

/// Filters for the movement listing
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub movement_type: Option<MovementType>,
    pub product_id: Option<Uuid>,
    /// Matches either the origin or the destination warehouse
    pub warehouse_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Aggregate line of the movement summary, one per type
#[derive(Debug, Clone, Serialize)]
pub struct MovementSummary {
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub count: i64,
    pub total_quantity: i64,
    pub total_value: Decimal,
}

/// Append-only ledger access
///
/// There is deliberately no update or delete operation.
#[async_trait]
pub trait MovementRepository: Send + Sync {
    /// Append a ledger row inside the caller's transaction, returning its id
    async fn insert(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        movement: &NewMovement,
    ) -> AppResult<i64>;

    async fn find_detail(&self, id: i64) -> AppResult<Option<MovementDetail>>;

    async fn list(
        &self,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<MovementDetail>>;

    async fn list_for_product(
        &self,
        product_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PagedResult<MovementDetail>>;

    /// Count, total quantity and total value per type over [start, end)
    async fn summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<MovementSummary>>;
}
