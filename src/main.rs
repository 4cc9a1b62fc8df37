use axum::Router;
use std::sync::Arc;
use stock_allocation_rust::{api, create_pool, logging, AllocationEngine, AllocationService, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let engine = Arc::new(AllocationEngine::new(config.allocation.clone()));
    let service = Arc::new(AllocationService::new(pool, Arc::clone(&engine)));

    let app = Router::new()
        .merge(api::snapshot_routes(engine))
        .merge(api::database_routes(service));
    let app = api::limit_concurrency(app, config.server.max_concurrent_requests);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/allocation/run     - allocate a posted snapshot");
    info!("  POST /api/allocation/run/db  - allocate the database snapshot");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
