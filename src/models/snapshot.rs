use crate::models::{DemandLine, DemandLineRecord, ExchangeRate, StockPosition};
use serde::{Deserialize, Serialize};

/// 单次分配运行的输入快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    pub demand_lines: Vec<DemandLineRecord>,
    #[serde(default)]
    pub stock_positions: Vec<StockPosition>,
    #[serde(default)]
    pub exchange_rates: Vec<ExchangeRate>,
}

impl AllocationSnapshot {
    /// 由已校验的需求行构建快照
    pub fn from_lines(
        lines: Vec<DemandLine>,
        stock_positions: Vec<StockPosition>,
        exchange_rates: Vec<ExchangeRate>,
    ) -> Self {
        Self {
            demand_lines: lines.into_iter().map(DemandLineRecord::from).collect(),
            stock_positions,
            exchange_rates,
        }
    }
}
