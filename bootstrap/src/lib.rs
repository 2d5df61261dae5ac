//! almacen-bootstrap - process startup
//!
//! Builds the shared infrastructure once at process start and hands it to
//! the service; no module-level singletons anywhere.

pub mod infrastructure;
pub mod retry;
pub mod runtime;

pub use infrastructure::Infrastructure;
pub use retry::{with_retry, RetryConfig};
pub use runtime::{init_runtime, shutdown_signal};
