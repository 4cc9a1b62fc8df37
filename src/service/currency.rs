use crate::models::ExchangeRateTable;
use bigdecimal::{BigDecimal, Zero};

/// 币种换算结果
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// 已是报告币种
    Identity(BigDecimal),
    /// 系统汇率 source -> reporting
    Direct(BigDecimal),
    /// 系统汇率 reporting -> source 取倒数
    Inverse(BigDecimal),
    /// 经参考币种中转 source -> reference -> reporting
    ViaReference(BigDecimal),
    /// 汇率缺失或为 0，无法换算 (N/A)
    Unconvertible,
}

impl Conversion {
    pub fn into_amount(self) -> Option<BigDecimal> {
        match self {
            Conversion::Identity(v)
            | Conversion::Direct(v)
            | Conversion::Inverse(v)
            | Conversion::ViaReference(v) => Some(v),
            Conversion::Unconvertible => None,
        }
    }
}

/// 报告币种换算器
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    reporting_currency: String,
    reference_currency: String,
    rates: ExchangeRateTable,
}

impl CurrencyConverter {
    pub fn new(reporting_currency: &str, reference_currency: &str, rates: ExchangeRateTable) -> Self {
        Self {
            reporting_currency: reporting_currency.to_string(),
            reference_currency: reference_currency.to_string(),
            rates,
        }
    }

    pub fn reporting_currency(&self) -> &str {
        &self.reporting_currency
    }

    /// 将本币金额换算为报告币种
    ///
    /// # 参数
    /// - `amount`: 本币金额
    /// - `source_currency`: 本币
    /// - `document_rate`: 单据汇率 (每单位参考币种的本币数量)，<= 0 视为缺失
    pub fn convert(&self, amount: &BigDecimal, source_currency: &str, document_rate: &BigDecimal) -> Conversion {
        if source_currency == self.reporting_currency {
            return Conversion::Identity(amount.clone());
        }

        if let Some(rate) = positive(self.rates.get(source_currency, &self.reporting_currency)) {
            return Conversion::Direct(amount * rate);
        }

        if let Some(rate) = positive(self.rates.get(&self.reporting_currency, source_currency)) {
            return Conversion::Inverse(amount / rate);
        }

        let Some(in_reference) = self.to_reference(amount, source_currency, document_rate) else {
            tracing::warn!("币种 {} 无法换算为参考币种 {}", source_currency, self.reference_currency);
            return Conversion::Unconvertible;
        };

        if self.reference_currency == self.reporting_currency {
            return Conversion::ViaReference(in_reference);
        }

        match positive(self.rates.get(&self.reference_currency, &self.reporting_currency)) {
            Some(rate) => Conversion::ViaReference(in_reference * rate),
            None => {
                tracing::warn!(
                    "缺少汇率 {} -> {}, 金额按 N/A 输出",
                    self.reference_currency,
                    self.reporting_currency
                );
                Conversion::Unconvertible
            }
        }
    }

    /// 本币 -> 参考币种: 优先单据汇率，其次系统汇率
    fn to_reference(&self, amount: &BigDecimal, source_currency: &str, document_rate: &BigDecimal) -> Option<BigDecimal> {
        if source_currency == self.reference_currency {
            return Some(amount.clone());
        }
        if *document_rate > BigDecimal::zero() {
            return Some(amount / document_rate);
        }
        positive(self.rates.get(source_currency, &self.reference_currency)).map(|rate| amount * rate)
    }
}

fn positive(rate: Option<&BigDecimal>) -> Option<&BigDecimal> {
    rate.filter(|r| **r > BigDecimal::zero())
}
