//! User account repository

use almacen_errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn save(&self, user: &User) -> AppResult<()>;

    /// Total number of accounts, used to decide whether to seed the admin
    async fn count(&self) -> AppResult<i64>;
}
