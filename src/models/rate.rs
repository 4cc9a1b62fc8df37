use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 系统汇率: 1 单位 from_currency = rate 单位 to_currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: BigDecimal,
}

/// 汇率表
#[derive(Debug, Clone, Default)]
pub struct ExchangeRateTable {
    rates: HashMap<(String, String), BigDecimal>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一币种对出现多次时，后出现的覆盖前者
    pub fn from_rates(rates: Vec<ExchangeRate>) -> Self {
        let rates = rates
            .into_iter()
            .map(|r| ((r.from_currency, r.to_currency), r.rate))
            .collect();
        Self { rates }
    }

    pub fn insert(&mut self, from: &str, to: &str, rate: BigDecimal) {
        self.rates.insert((from.to_string(), to.to_string()), rate);
    }

    pub fn get(&self, from: &str, to: &str) -> Option<&BigDecimal> {
        self.rates.get(&(from.to_string(), to.to_string()))
    }
}
