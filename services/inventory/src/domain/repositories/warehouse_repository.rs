//! Warehouse master-data repository

use almacen_common::{PagedResult, Pagination};
use almacen_errors::AppResult;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::Warehouse;

#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn exists(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
    ) -> AppResult<bool>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Warehouse>>;

    async fn save(&self, warehouse: &Warehouse) -> AppResult<()>;

    async fn update(&self, warehouse: &Warehouse) -> AppResult<()>;

    /// Fails with a conflict while movements or stock rows still reference it
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Warehouse>>;
}
