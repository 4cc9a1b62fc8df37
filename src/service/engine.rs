use crate::config::AllocationConfig;
use crate::error::AllocationError;
use crate::models::{
    AllocationResult, AllocationRun, AllocationSnapshot, DemandLine, DemandLineRecord, ExchangeRateTable,
    PoolSummary, RankedDemandLine, StockPositions,
};
use crate::service::allocator::{PoolAllocation, WaterfallAllocator};
use crate::service::annotator::ValueAnnotator;
use crate::service::currency::CurrencyConverter;
use crate::service::ranker::PriorityRanker;
use bigdecimal::BigDecimal;
use chrono::Utc;
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

/// 分配引擎: 排序 -> 瀑布分配 -> 金额标注
///
/// 纯计算，不访问数据库；分配池之间互不影响，可并行
pub struct AllocationEngine {
    config: AllocationConfig,
    ranker: PriorityRanker,
    allocator: WaterfallAllocator,
}

impl AllocationEngine {
    pub fn new(config: AllocationConfig) -> Self {
        Self {
            config,
            ranker: PriorityRanker::new(),
            allocator: WaterfallAllocator::new(),
        }
    }

    /// 对一个输入快照执行完整分配
    pub fn run(&self, snapshot: AllocationSnapshot) -> Result<AllocationRun, AllocationError> {
        let start = Instant::now();
        let AllocationSnapshot {
            demand_lines,
            stock_positions,
            exchange_rates,
        } = snapshot;

        let stock = StockPositions::from_positions(stock_positions)?;
        let annotator = ValueAnnotator::new(CurrencyConverter::new(
            &self.config.reporting_currency,
            &self.config.reference_currency,
            ExchangeRateTable::from_rates(exchange_rates),
        ));

        let total_lines = demand_lines.len();
        let (poolable, excluded_line_ids) = partition_poolable(demand_lines)?;

        let pools = self.ranker.rank(poolable)?;
        let pool_count = pools.len();
        let pools: Vec<(String, BigDecimal, Vec<RankedDemandLine>)> = pools
            .into_iter()
            .map(|(item_code, ranked)| {
                let available = stock.available(&item_code);
                (item_code, available, ranked)
            })
            .collect();

        let allocated: Vec<PoolAllocation> = if pool_count >= self.config.parallel_pool_threshold {
            tracing::debug!("并行处理 {} 个分配池", pool_count);
            pools
                .into_par_iter()
                .map(|(item_code, available, ranked)| self.allocator.allocate_pool(&item_code, &available, ranked))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            pools
                .into_iter()
                .map(|(item_code, available, ranked)| self.allocator.allocate_pool(&item_code, &available, ranked))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut results: Vec<AllocationResult> = Vec::with_capacity(total_lines);
        let mut pool_summaries: Vec<PoolSummary> = Vec::with_capacity(pool_count);
        for pool in allocated {
            tracing::debug!(
                "分配池 {}: 可用 {}, 合格需求 {}, 建议分配 {}, 缺口 {}",
                pool.summary.item_code,
                pool.summary.available_quantity,
                pool.summary.total_eligible_demand,
                pool.summary.total_proposed,
                pool.summary.shortfall
            );
            results.extend(pool.lines.into_iter().map(|l| annotator.annotate(l)));
            pool_summaries.push(pool.summary);
        }

        tracing::info!(
            "分配完成: 需求行 {}, 进池 {}, 剔除 {}, 分配池 {}, 耗时 {:?}",
            total_lines,
            results.len(),
            excluded_line_ids.len(),
            pool_count,
            start.elapsed()
        );

        Ok(AllocationRun {
            reporting_currency: annotator.reporting_currency().to_string(),
            results,
            pool_summaries,
            excluded_line_ids,
            computed_at: Utc::now(),
        })
    }
}

/// 剔除无法进池的需求行 (日期缺失、无未发货数量或数量异常)
///
/// line_id 在整次运行内唯一，同一 ID 出现在不同物料下视为结构性错误
fn partition_poolable(records: Vec<DemandLineRecord>) -> Result<(Vec<DemandLine>, Vec<i64>), AllocationError> {
    let mut owners: HashMap<i64, &str> = HashMap::with_capacity(records.len());
    for record in &records {
        if let Some(first) = owners.insert(record.line_id, &record.item_code) {
            if first != record.item_code {
                return Err(AllocationError::ConflictingLineId {
                    line_id: record.line_id,
                    first: first.to_string(),
                    second: record.item_code.clone(),
                });
            }
        }
    }

    let mut poolable = Vec::with_capacity(records.len());
    let mut excluded = Vec::new();
    for record in records {
        let line_id = record.line_id;
        let Some(line) = record.into_demand_line() else {
            excluded.push(line_id);
            continue;
        };
        if line.is_poolable() {
            poolable.push(line);
        } else {
            tracing::warn!(
                "需求行 {} (物料 {}) 数量异常, 不参与分配: 订购 {}, 已发 {}",
                line.line_id,
                line.item_code,
                line.quantity_ordered,
                line.quantity_dispatched
            );
            excluded.push(line.line_id);
        }
    }
    excluded.sort_unstable();
    Ok((poolable, excluded))
}
