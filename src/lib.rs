pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;

pub use config::{AllocationConfig, AppConfig};
pub use db::create_pool;
pub use error::{AllocationError, ServiceError};
pub use service::{AllocationEngine, AllocationService};
