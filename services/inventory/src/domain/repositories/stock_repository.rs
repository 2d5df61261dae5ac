//! Stock projection repository

use almacen_common::{PagedResult, Pagination};
use almacen_errors::AppResult;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{StockLevel, StockLevelDetail};
use crate::domain::movement_type::StockChange;

#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
}

#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Current stock for (product, warehouse), locking the row for the
    /// remainder of the transaction; 0 when no row exists yet
    async fn stock_for_update(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<i64>;

    /// Apply one projection change inside the caller's transaction
    async fn apply(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        product_id: Uuid,
        change: &StockChange,
    ) -> AppResult<()>;

    async fn get(&self, product_id: Uuid, warehouse_id: Uuid) -> AppResult<Option<StockLevel>>;

    async fn list(
        &self,
        filter: &StockFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<StockLevelDetail>>;
}
