use thiserror::Error;

/// 分配引擎结构性错误
///
/// 数据质量问题（负库存、缺失汇率、缺失日期）在本地兜底处理，不会出现在这里；
/// 这里只收录说明排序/分配不变量已被破坏、后续计算不再可信的情况。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("分配池 {item_code} 中存在重复的需求行ID: {line_id}")]
    DuplicateLineId { item_code: String, line_id: i64 },

    #[error("需求行ID {line_id} 同时出现在物料 {first} 和 {second} 下")]
    ConflictingLineId {
        line_id: i64,
        first: String,
        second: String,
    },

    #[error("分配池 {item_code} 的优先级不连续: 位置 {position} 期望 {expected}, 实际 {actual}")]
    NonDenseRank {
        item_code: String,
        position: usize,
        expected: u32,
        actual: u32,
    },

    #[error("需求行 {line_id} 的物料 {actual} 不属于分配池 {expected}")]
    PoolMismatch {
        expected: String,
        actual: String,
        line_id: i64,
    },

    #[error("物料 {0} 存在多条库存记录")]
    DuplicateStockPosition(String),
}

/// 服务层错误
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("分配任务执行失败: {0}")]
    Worker(String),
}
