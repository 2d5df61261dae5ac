pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use response::{ApiError, ApiResponse, ApiResult};
pub use routes::build_router;
