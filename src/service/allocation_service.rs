use crate::db::queries;
use crate::error::ServiceError;
use crate::models::AllocationRun;
use crate::service::engine::AllocationEngine;
use sqlx::PgPool;
use std::sync::Arc;

/// 分配服务: 从数据库快照读取输入并执行分配 (只读，不回写)
pub struct AllocationService {
    pool: PgPool,
    engine: Arc<AllocationEngine>,
}

impl AllocationService {
    pub fn new(pool: PgPool, engine: Arc<AllocationEngine>) -> Self {
        Self { pool, engine }
    }

    /// 读取快照并分配 (item_codes 为空时全部物料)
    pub async fn run_from_database(&self, item_codes: &[String]) -> Result<AllocationRun, ServiceError> {
        let snapshot = queries::load_snapshot(&self.pool, item_codes).await?;

        // 纯计算部分放到阻塞线程池，避免占用异步工作线程
        let engine = Arc::clone(&self.engine);
        let run = tokio::task::spawn_blocking(move || engine.run(snapshot))
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))??;

        tracing::info!(
            "Allocation run finished: {} lines, {} pools",
            run.results.len(),
            run.pool_summaries.len()
        );
        Ok(run)
    }
}
