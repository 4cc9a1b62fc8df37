use crate::error::AllocationError;
use crate::models::{LineAllocation, PoolSummary, RankedDemandLine};
use bigdecimal::{BigDecimal, Zero};

/// 单个分配池的瀑布分配结果
#[derive(Debug, Clone, PartialEq)]
pub struct PoolAllocation {
    pub lines: Vec<LineAllocation>,
    pub summary: PoolSummary,
}

/// 瀑布分配器
///
/// 按优先级顺序单次扫描分配池，累计需求超过可用库存后，
/// 跨越边界的一行拿到剩余部分，其后各行均为 0。
pub struct WaterfallAllocator;

impl WaterfallAllocator {
    pub fn new() -> Self {
        Self
    }

    /// 对单个分配池执行瀑布分配
    ///
    /// # 参数
    /// - `item_code`: 分配池物料编码
    /// - `available_quantity`: 可用库存，负数按 0 处理
    /// - `ranked`: 已按 priority_rank 排好序的需求行
    pub fn allocate_pool(
        &self,
        item_code: &str,
        available_quantity: &BigDecimal,
        ranked: Vec<RankedDemandLine>,
    ) -> Result<PoolAllocation, AllocationError> {
        validate_pool(item_code, &ranked)?;

        let available = if *available_quantity < BigDecimal::zero() {
            tracing::warn!("物料 {} 可用库存为负 ({}), 按 0 分配", item_code, available_quantity);
            BigDecimal::zero()
        } else {
            available_quantity.clone()
        };

        let mut summary = PoolSummary {
            item_code: item_code.to_string(),
            available_quantity: available.clone(),
            total_eligible_demand: BigDecimal::zero(),
            total_proposed: BigDecimal::zero(),
            shortfall: BigDecimal::zero(),
            line_count: ranked.len(),
            fully_allocated_lines: 0,
            partially_allocated_lines: 0,
            unallocated_lines: 0,
        };

        // (cumulative_before, cumulative_including) 随扫描前移
        let mut cumulative_before = BigDecimal::zero();
        let mut lines = Vec::with_capacity(ranked.len());

        for ranked_line in ranked {
            let eligible = eligible_quantity(&ranked_line);
            let cumulative_including = &cumulative_before + &eligible;

            let proposed = if ranked_line.line.has_reserved_stock() {
                BigDecimal::zero()
            } else if available <= cumulative_before {
                BigDecimal::zero()
            } else if available >= cumulative_including {
                eligible.clone()
            } else {
                std::cmp::max(&available - &cumulative_before, BigDecimal::zero())
            };

            let remaining_before = std::cmp::max(&available - &cumulative_before, BigDecimal::zero());

            tracing::debug!(
                "物料 {} 行 {} 优先级 {}: 合格 {}, 累计 {} -> {}, 建议分配 {}",
                item_code,
                ranked_line.line.line_id,
                ranked_line.priority_rank,
                eligible,
                cumulative_before,
                cumulative_including,
                proposed
            );

            if eligible > BigDecimal::zero() {
                if proposed == eligible {
                    summary.fully_allocated_lines += 1;
                } else if proposed > BigDecimal::zero() {
                    summary.partially_allocated_lines += 1;
                } else {
                    summary.unallocated_lines += 1;
                }
            }
            summary.total_eligible_demand += &eligible;
            summary.total_proposed += &proposed;

            lines.push(LineAllocation {
                ranked: ranked_line,
                eligible_quantity: eligible,
                proposed_allocation: proposed,
                prior_cumulative_demand: cumulative_before,
                running_cumulative_demand: cumulative_including.clone(),
                stock_remaining_before_this_line: remaining_before,
            });

            cumulative_before = cumulative_including;
        }

        summary.shortfall = &summary.total_eligible_demand - &summary.total_proposed;

        Ok(PoolAllocation { lines, summary })
    }
}

impl Default for WaterfallAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// 参与本次分配的数量: 已预留的行不再参与竞争
pub fn eligible_quantity(ranked: &RankedDemandLine) -> BigDecimal {
    if ranked.line.has_reserved_stock() {
        BigDecimal::zero()
    } else {
        std::cmp::max(ranked.line.quantity_due(), BigDecimal::zero())
    }
}

/// 校验分配池结构: 物料一致，优先级为 1..N 且按序排列
fn validate_pool(item_code: &str, ranked: &[RankedDemandLine]) -> Result<(), AllocationError> {
    for (position, r) in ranked.iter().enumerate() {
        if r.line.item_code != item_code {
            return Err(AllocationError::PoolMismatch {
                expected: item_code.to_string(),
                actual: r.line.item_code.clone(),
                line_id: r.line.line_id,
            });
        }
        let expected = position as u32 + 1;
        if r.priority_rank != expected {
            return Err(AllocationError::NonDenseRank {
                item_code: item_code.to_string(),
                position,
                expected,
                actual: r.priority_rank,
            });
        }
    }
    Ok(())
}
