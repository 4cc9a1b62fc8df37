use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// 客户订单行 (参与库存竞争的需求)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    pub line_id: i64,
    pub item_code: String,              // 物料编码，决定所属分配池
    pub quantity_ordered: BigDecimal,
    pub quantity_dispatched: BigDecimal,
    #[serde(default = "BigDecimal::zero")]
    pub quantity_allocated: BigDecimal, // 已预留数量
    pub promised_date: NaiveDate,       // 承诺交期
    pub document_date: NaiveDateTime,   // 下单时间，同交期时先到先得
    pub unit_price: BigDecimal,
    pub currency_id: String,
    #[serde(default = "BigDecimal::zero")]
    pub exchange_rate: BigDecimal,      // 单据汇率: 每单位参考币种折合的本币数量
}

impl DemandLine {
    /// 未发货数量 (ordered - dispatched)
    pub fn quantity_due(&self) -> BigDecimal {
        &self.quantity_ordered - &self.quantity_dispatched
    }

    /// 是否已持有预留库存
    pub fn has_reserved_stock(&self) -> bool {
        self.quantity_allocated > BigDecimal::zero()
    }

    /// 是否可以进入分配池
    ///
    /// 已发货超过订购量、或没有未发货数量的行在进池前剔除
    pub fn is_poolable(&self) -> bool {
        self.quantity_dispatched >= BigDecimal::zero()
            && self.quantity_ordered >= self.quantity_dispatched
            && self.quantity_due() > BigDecimal::zero()
    }
}

/// 需求快照记录 (t_alloc_demand_line 行 / 接口请求中的需求行)
///
/// 日期缺失或格式错误时为 None，转换为 DemandLine 时剔除
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct DemandLineRecord {
    pub line_id: i64,
    pub item_code: String,
    pub quantity_ordered: BigDecimal,
    pub quantity_dispatched: BigDecimal,
    #[serde(default)]
    pub quantity_allocated: Option<BigDecimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub promised_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub document_date: Option<NaiveDateTime>,
    pub unit_price: BigDecimal,
    pub currency_id: String,
    #[serde(default)]
    pub exchange_rate: Option<BigDecimal>,
}

impl DemandLineRecord {
    /// 转换为需求行，日期缺失的行返回 None
    pub fn into_demand_line(self) -> Option<DemandLine> {
        let (Some(promised_date), Some(document_date)) = (self.promised_date, self.document_date) else {
            tracing::warn!(
                "需求行 {} (物料 {}) 缺少承诺交期或下单时间, 跳过",
                self.line_id, self.item_code
            );
            return None;
        };

        Some(DemandLine {
            line_id: self.line_id,
            item_code: self.item_code,
            quantity_ordered: self.quantity_ordered,
            quantity_dispatched: self.quantity_dispatched,
            quantity_allocated: self.quantity_allocated.unwrap_or_else(BigDecimal::zero),
            promised_date,
            document_date,
            unit_price: self.unit_price,
            currency_id: self.currency_id,
            exchange_rate: self.exchange_rate.unwrap_or_else(BigDecimal::zero),
        })
    }
}

impl From<DemandLine> for DemandLineRecord {
    fn from(line: DemandLine) -> Self {
        Self {
            line_id: line.line_id,
            item_code: line.item_code,
            quantity_ordered: line.quantity_ordered,
            quantity_dispatched: line.quantity_dispatched,
            quantity_allocated: Some(line.quantity_allocated),
            promised_date: Some(line.promised_date),
            document_date: Some(line.document_date),
            unit_price: line.unit_price,
            currency_id: line.currency_id,
            exchange_rate: Some(line.exchange_rate),
        }
    }
}

/// null 或无法解析的日期字符串按 None 处理
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("无法解析的日期: {}", s);
            None
        }
    }))
}
