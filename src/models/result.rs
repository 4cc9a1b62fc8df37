use crate::models::DemandLine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 带优先级的需求行 (priority_rank 在分配池内从 1 开始连续编号)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDemandLine {
    pub priority_rank: u32,
    #[serde(flatten)]
    pub line: DemandLine,
}

/// 瀑布分配中单行的计算结果 (未附加金额与状态)
#[derive(Debug, Clone, PartialEq)]
pub struct LineAllocation {
    pub ranked: RankedDemandLine,
    pub eligible_quantity: BigDecimal,
    pub proposed_allocation: BigDecimal,
    pub prior_cumulative_demand: BigDecimal,
    pub running_cumulative_demand: BigDecimal,
    pub stock_remaining_before_this_line: BigDecimal,
}

/// 运行前分配状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    #[serde(rename = "Fully Allocated")]
    FullyAllocated,
    #[serde(rename = "Partially Allocated")]
    PartiallyAllocated,
    #[serde(rename = "Not Allocated")]
    NotAllocated,
}

/// 运行后 (建议分配生效时) 的分配状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposedStatus {
    #[serde(rename = "Would be Fully Allocated")]
    WouldBeFullyAllocated,
    #[serde(rename = "Would be Partially Allocated")]
    WouldBePartiallyAllocated,
    #[serde(rename = "Would Remain Unallocated")]
    WouldRemainUnallocated,
}

/// 分配结果 (每条进池需求行一条)
///
/// 报告币种金额为 None 表示汇率不可用 (N/A)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub line_id: i64,
    pub item_code: String,
    pub priority_rank: u32,
    pub promised_date: NaiveDate,
    pub quantity_ordered: BigDecimal,
    pub quantity_dispatched: BigDecimal,
    pub quantity_allocated: BigDecimal,
    pub quantity_due: BigDecimal,
    pub eligible_quantity: BigDecimal,
    pub proposed_allocation: BigDecimal,
    pub prior_cumulative_demand: BigDecimal,
    pub running_cumulative_demand: BigDecimal,
    pub stock_remaining_before_this_line: BigDecimal,
    pub current_status: AllocationStatus,
    pub proposed_status: ProposedStatus,
    pub currency_id: String,
    pub unit_price: BigDecimal,
    pub unit_price_reporting: Option<BigDecimal>,
    pub due_value_reporting: Option<BigDecimal>,
    pub proposed_value_reporting: Option<BigDecimal>,
}

/// 单个分配池的统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub item_code: String,
    pub available_quantity: BigDecimal,
    pub total_eligible_demand: BigDecimal,
    pub total_proposed: BigDecimal,
    pub shortfall: BigDecimal,          // 未能满足的合格需求
    pub line_count: usize,
    pub fully_allocated_lines: usize,
    pub partially_allocated_lines: usize,
    pub unallocated_lines: usize,       // 合格需求 > 0 但分配为 0
}

/// 一次分配运行的完整输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRun {
    pub reporting_currency: String,
    pub results: Vec<AllocationResult>,
    pub pool_summaries: Vec<PoolSummary>,
    pub excluded_line_ids: Vec<i64>,    // 数据质量问题被剔除的需求行
    pub computed_at: DateTime<Utc>,
}
