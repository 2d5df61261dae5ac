//! Supplier master-data repository

use almacen_common::{PagedResult, Pagination};
use almacen_errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Supplier;

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>>;

    async fn save(&self, supplier: &Supplier) -> AppResult<()>;

    async fn update(&self, supplier: &Supplier) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Supplier>>;
}
