pub mod handlers;

pub use handlers::*;

use crate::service::{AllocationEngine, AllocationService};
use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;

/// 不依赖数据库的路由
pub fn snapshot_routes(engine: Arc<AllocationEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/allocation/run", post(run_snapshot))
        .with_state(engine)
}

/// 基于数据库快照的路由
pub fn database_routes(service: Arc<AllocationService>) -> Router {
    Router::new()
        .route("/api/allocation/run/db", post(run_database))
        .with_state(service)
}

/// 限制同时处理的请求数 (所有路由共用一个许可池)
pub fn limit_concurrency(router: Router, max_concurrent_requests: usize) -> Router {
    router.layer(GlobalConcurrencyLimitLayer::new(max_concurrent_requests.max(1)))
}
