use crate::error::ServiceError;
use crate::models::{AllocationRun, AllocationSnapshot};
use crate::service::{AllocationEngine, AllocationService};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 物料编码列表 (为空表示全部)
#[derive(Debug, Default, Deserialize)]
pub struct DatabaseRunRequest {
    #[serde(default)]
    pub item_codes: Vec<String>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub success: bool,
    pub message: String,
    pub run: Option<AllocationRun>,
}

impl AllocationResponse {
    fn ok(run: AllocationRun) -> Response {
        let response = AllocationResponse {
            success: true,
            message: format!(
                "Allocated {} lines across {} pools",
                run.results.len(),
                run.pool_summaries.len()
            ),
            run: Some(run),
        };
        (StatusCode::OK, Json(response)).into_response()
    }

    fn error(status: StatusCode, e: impl std::fmt::Display) -> Response {
        let response = AllocationResponse {
            success: false,
            message: format!("Error: {}", e),
            run: None,
        };
        (status, Json(response)).into_response()
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 对请求中携带的快照执行分配 (不访问数据库)
pub async fn run_snapshot(
    State(engine): State<Arc<AllocationEngine>>,
    Json(snapshot): Json<AllocationSnapshot>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || engine.run(snapshot)).await;
    match result {
        Ok(Ok(run)) => AllocationResponse::ok(run),
        Ok(Err(e)) => {
            tracing::error!("Allocation rejected: {}", e);
            AllocationResponse::error(StatusCode::UNPROCESSABLE_ENTITY, e)
        }
        Err(e) => AllocationResponse::error(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// 从数据库快照执行分配
pub async fn run_database(
    State(service): State<Arc<AllocationService>>,
    Json(req): Json<DatabaseRunRequest>,
) -> Response {
    match service.run_from_database(&req.item_codes).await {
        Ok(run) => AllocationResponse::ok(run),
        Err(ServiceError::Allocation(e)) => {
            tracing::error!("Allocation rejected: {}", e);
            AllocationResponse::error(StatusCode::UNPROCESSABLE_ENTITY, e)
        }
        Err(e) => {
            tracing::error!("Allocation run failed: {}", e);
            AllocationResponse::error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
