//! Product master-data repository

use almacen_common::{PagedResult, Pagination};
use almacen_errors::AppResult;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::Product;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// In-transaction existence check, used by the movement validator
    async fn exists(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
    ) -> AppResult<bool>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn exists_by_sku(&self, sku: &str) -> AppResult<bool>;

    async fn save(&self, product: &Product) -> AppResult<()>;

    async fn update(&self, product: &Product) -> AppResult<()>;

    /// Fails with a conflict while movements still reference the product
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Product>>;
}
