use crate::error::AllocationError;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 物料库存头寸
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPosition {
    pub item_code: String,
    pub available_quantity: BigDecimal,
}

/// 按物料编码索引的库存头寸
///
/// 查询为空安全：缺失物料视为零库存 (负库存由分配器按零处理)
#[derive(Debug, Clone, Default)]
pub struct StockPositions {
    positions: HashMap<String, BigDecimal>,
}

impl StockPositions {
    /// 从库存记录构建，同一物料出现多次视为结构性错误
    pub fn from_positions(positions: Vec<StockPosition>) -> Result<Self, AllocationError> {
        let mut map = HashMap::with_capacity(positions.len());
        for p in positions {
            if map.contains_key(&p.item_code) {
                return Err(AllocationError::DuplicateStockPosition(p.item_code));
            }
            map.insert(p.item_code, p.available_quantity);
        }
        Ok(Self { positions: map })
    }

    /// 获取某物料的可用数量
    pub fn available(&self, item_code: &str) -> BigDecimal {
        match self.positions.get(item_code) {
            Some(qty) => qty.clone(),
            None => {
                tracing::debug!("物料 {} 无库存记录, 按 0 处理", item_code);
                BigDecimal::zero()
            }
        }
    }
}
