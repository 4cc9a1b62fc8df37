use crate::error::AllocationError;
use crate::models::{DemandLine, RankedDemandLine};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashSet;

/// 优先级排序器
///
/// 排序键 (升序):
/// 1) 已持有预留库存的行排在最后
/// 2) promised_date 升序 (交期近的先满足)
/// 3) document_date 升序 (先下单先满足)
/// 4) line_id 升序 (保证完全相同的键也有确定顺序)
pub struct PriorityRanker;

impl PriorityRanker {
    pub fn new() -> Self {
        Self
    }

    /// 按物料编码分池并编号
    ///
    /// 返回的分配池按 item_code 升序排列，池内 priority_rank 为 1..N
    pub fn rank(
        &self,
        lines: Vec<DemandLine>,
    ) -> Result<IndexMap<String, Vec<RankedDemandLine>>, AllocationError> {
        let mut pools: IndexMap<String, Vec<DemandLine>> = IndexMap::new();
        for line in lines {
            pools.entry(line.item_code.clone()).or_default().push(line);
        }
        pools.sort_keys();

        let mut ranked = IndexMap::with_capacity(pools.len());
        for (item_code, pool) in pools {
            let pool = self.rank_pool(&item_code, pool)?;
            ranked.insert(item_code, pool);
        }
        Ok(ranked)
    }

    /// 对单个分配池排序并分配连续的优先级
    pub fn rank_pool(
        &self,
        item_code: &str,
        mut pool: Vec<DemandLine>,
    ) -> Result<Vec<RankedDemandLine>, AllocationError> {
        let mut seen = HashSet::with_capacity(pool.len());
        for line in &pool {
            if !seen.insert(line.line_id) {
                return Err(AllocationError::DuplicateLineId {
                    item_code: item_code.to_string(),
                    line_id: line.line_id,
                });
            }
        }

        pool.sort_by(compare);

        Ok(pool
            .into_iter()
            .zip(1u32..)
            .map(|(line, priority_rank)| RankedDemandLine { priority_rank, line })
            .collect())
    }
}

impl Default for PriorityRanker {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &DemandLine, b: &DemandLine) -> Ordering {
    a.has_reserved_stock()
        .cmp(&b.has_reserved_stock())
        .then_with(|| a.promised_date.cmp(&b.promised_date))
        .then_with(|| a.document_date.cmp(&b.document_date))
        .then_with(|| a.line_id.cmp(&b.line_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::{BigDecimal, Zero};
    use chrono::NaiveDate;

    fn line(id: i64, item: &str, allocated: i64, promised: (i32, u32, u32), doc_day: u32) -> DemandLine {
        DemandLine {
            line_id: id,
            item_code: item.to_string(),
            quantity_ordered: BigDecimal::from(10),
            quantity_dispatched: BigDecimal::zero(),
            quantity_allocated: BigDecimal::from(allocated),
            promised_date: NaiveDate::from_ymd_opt(promised.0, promised.1, promised.2).unwrap(),
            document_date: NaiveDate::from_ymd_opt(2024, 1, doc_day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            unit_price: BigDecimal::from(1),
            currency_id: "USD".to_string(),
            exchange_rate: BigDecimal::from(1),
        }
    }

    fn ids(pool: &[RankedDemandLine]) -> Vec<i64> {
        pool.iter().map(|r| r.line.line_id).collect()
    }

    #[test]
    fn test_earlier_promise_ranks_first() {
        let ranker = PriorityRanker::new();
        let pools = ranker
            .rank(vec![
                line(1, "A", 0, (2024, 3, 10), 1),
                line(2, "A", 0, (2024, 3, 1), 5),
            ])
            .unwrap();
        assert_eq!(ids(&pools["A"]), vec![2, 1]);
        assert_eq!(pools["A"][0].priority_rank, 1);
        assert_eq!(pools["A"][1].priority_rank, 2);
    }

    #[test]
    fn test_reserved_lines_sort_last() {
        let ranker = PriorityRanker::new();
        let pools = ranker
            .rank(vec![
                line(1, "A", 5, (2024, 1, 1), 1),
                line(2, "A", 0, (2024, 6, 1), 2),
            ])
            .unwrap();
        assert_eq!(ids(&pools["A"]), vec![2, 1]);
    }

    #[test]
    fn test_document_date_then_line_id_break_ties() {
        let ranker = PriorityRanker::new();
        let pools = ranker
            .rank(vec![
                line(9, "A", 0, (2024, 3, 1), 4),
                line(7, "A", 0, (2024, 3, 1), 4),
                line(8, "A", 0, (2024, 3, 1), 2),
            ])
            .unwrap();
        assert_eq!(ids(&pools["A"]), vec![8, 7, 9]);
    }

    #[test]
    fn test_pools_are_independent_and_dense() {
        let ranker = PriorityRanker::new();
        let pools = ranker
            .rank(vec![
                line(1, "B", 0, (2024, 3, 1), 1),
                line(2, "A", 0, (2024, 3, 1), 1),
                line(3, "B", 0, (2024, 2, 1), 1),
            ])
            .unwrap();
        let keys: Vec<&String> = pools.keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
        let ranks: Vec<u32> = pools["B"].iter().map(|r| r.priority_rank).collect();
        assert_eq!(ranks, vec![1, 2]);
        assert_eq!(pools["A"][0].priority_rank, 1);
    }

    #[test]
    fn test_duplicate_line_id_is_rejected() {
        let ranker = PriorityRanker::new();
        let err = ranker
            .rank(vec![
                line(1, "A", 0, (2024, 3, 1), 1),
                line(1, "A", 0, (2024, 3, 2), 1),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            AllocationError::DuplicateLineId {
                item_code: "A".to_string(),
                line_id: 1
            }
        );
    }

    #[test]
    fn test_input_order_does_not_change_ranks() {
        let ranker = PriorityRanker::new();
        let lines = vec![
            line(1, "A", 0, (2024, 3, 1), 3),
            line(2, "A", 2, (2024, 1, 1), 1),
            line(3, "A", 0, (2024, 3, 1), 1),
            line(4, "A", 0, (2024, 2, 1), 9),
        ];
        let mut reversed = lines.clone();
        reversed.reverse();

        let a = ranker.rank(lines).unwrap();
        let b = ranker.rank(reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(ids(&a["A"]), vec![4, 3, 1, 2]);
    }
}
