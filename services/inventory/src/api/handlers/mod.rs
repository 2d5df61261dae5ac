pub mod audit;
pub mod auth;
pub mod movements;
pub mod products;
pub mod stock;
pub mod suppliers;
pub mod system;
pub mod warehouses;

use almacen_common::Pagination;
use serde::Deserialize;

/// Plain page/limit query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page, self.limit)
    }
}
