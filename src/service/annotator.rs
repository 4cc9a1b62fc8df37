use crate::models::{AllocationResult, AllocationStatus, LineAllocation, ProposedStatus};
use crate::service::currency::CurrencyConverter;
use bigdecimal::{BigDecimal, Zero};

/// 运行前状态 (基于已预留数量)
pub fn current_status(
    quantity_allocated: &BigDecimal,
    quantity_dispatched: &BigDecimal,
    quantity_ordered: &BigDecimal,
) -> AllocationStatus {
    let due = quantity_ordered - quantity_dispatched;
    if *quantity_allocated > BigDecimal::zero() && *quantity_allocated >= due {
        AllocationStatus::FullyAllocated
    } else if *quantity_allocated > BigDecimal::zero() {
        AllocationStatus::PartiallyAllocated
    } else {
        AllocationStatus::NotAllocated
    }
}

/// 运行后状态 (已预留 + 建议分配)
pub fn proposed_status(
    quantity_allocated: &BigDecimal,
    quantity_dispatched: &BigDecimal,
    quantity_ordered: &BigDecimal,
    proposed_allocation: &BigDecimal,
) -> ProposedStatus {
    let due = quantity_ordered - quantity_dispatched;
    let total = quantity_allocated + proposed_allocation;
    if total > BigDecimal::zero() && total >= due {
        ProposedStatus::WouldBeFullyAllocated
    } else if total > BigDecimal::zero() {
        ProposedStatus::WouldBePartiallyAllocated
    } else {
        ProposedStatus::WouldRemainUnallocated
    }
}

/// 金额与状态标注，不改变分配数量
pub struct ValueAnnotator {
    converter: CurrencyConverter,
}

impl ValueAnnotator {
    pub fn new(converter: CurrencyConverter) -> Self {
        Self { converter }
    }

    pub fn reporting_currency(&self) -> &str {
        self.converter.reporting_currency()
    }

    pub fn annotate(&self, allocation: LineAllocation) -> AllocationResult {
        let LineAllocation {
            ranked,
            eligible_quantity,
            proposed_allocation,
            prior_cumulative_demand,
            running_cumulative_demand,
            stock_remaining_before_this_line,
        } = allocation;
        let line = ranked.line;
        let quantity_due = line.quantity_due();

        let unit_price_reporting = self
            .converter
            .convert(&line.unit_price, &line.currency_id, &line.exchange_rate)
            .into_amount();
        let due_value_reporting = unit_price_reporting.as_ref().map(|p| p * &quantity_due);
        let proposed_value_reporting = unit_price_reporting.as_ref().map(|p| p * &proposed_allocation);

        AllocationResult {
            line_id: line.line_id,
            priority_rank: ranked.priority_rank,
            promised_date: line.promised_date,
            current_status: current_status(
                &line.quantity_allocated,
                &line.quantity_dispatched,
                &line.quantity_ordered,
            ),
            proposed_status: proposed_status(
                &line.quantity_allocated,
                &line.quantity_dispatched,
                &line.quantity_ordered,
                &proposed_allocation,
            ),
            item_code: line.item_code,
            quantity_ordered: line.quantity_ordered,
            quantity_dispatched: line.quantity_dispatched,
            quantity_allocated: line.quantity_allocated,
            quantity_due,
            eligible_quantity,
            proposed_allocation,
            prior_cumulative_demand,
            running_cumulative_demand,
            stock_remaining_before_this_line,
            currency_id: line.currency_id,
            unit_price: line.unit_price,
            unit_price_reporting,
            due_value_reporting,
            proposed_value_reporting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DemandLine, ExchangeRateTable, RankedDemandLine};
    use chrono::NaiveDate;

    fn n(v: i64) -> BigDecimal {
        BigDecimal::from(v)
    }

    #[test]
    fn test_current_status_labels() {
        assert_eq!(current_status(&n(0), &n(0), &n(10)), AllocationStatus::NotAllocated);
        assert_eq!(current_status(&n(4), &n(0), &n(10)), AllocationStatus::PartiallyAllocated);
        assert_eq!(current_status(&n(6), &n(4), &n(10)), AllocationStatus::FullyAllocated);
    }

    #[test]
    fn test_proposed_status_labels() {
        assert_eq!(proposed_status(&n(0), &n(0), &n(10), &n(0)), ProposedStatus::WouldRemainUnallocated);
        assert_eq!(proposed_status(&n(0), &n(0), &n(10), &n(3)), ProposedStatus::WouldBePartiallyAllocated);
        assert_eq!(proposed_status(&n(0), &n(2), &n(10), &n(8)), ProposedStatus::WouldBeFullyAllocated);
        assert_eq!(proposed_status(&n(5), &n(0), &n(10), &n(0)), ProposedStatus::WouldBePartiallyAllocated);
    }

    #[test]
    fn test_annotate_converts_values() {
        let mut rates = ExchangeRateTable::new();
        rates.insert("GBP", "USD", n(2));
        let annotator = ValueAnnotator::new(CurrencyConverter::new("USD", "EUR", rates));

        let allocation = LineAllocation {
            ranked: RankedDemandLine {
                priority_rank: 1,
                line: DemandLine {
                    line_id: 42,
                    item_code: "A".to_string(),
                    quantity_ordered: n(10),
                    quantity_dispatched: n(2),
                    quantity_allocated: n(0),
                    promised_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    document_date: NaiveDate::from_ymd_opt(2023, 12, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    unit_price: n(3),
                    currency_id: "GBP".to_string(),
                    exchange_rate: n(0),
                },
            },
            eligible_quantity: n(8),
            proposed_allocation: n(5),
            prior_cumulative_demand: n(0),
            running_cumulative_demand: n(8),
            stock_remaining_before_this_line: n(5),
        };

        let result = annotator.annotate(allocation);
        assert_eq!(result.quantity_due, n(8));
        assert_eq!(result.unit_price_reporting, Some(n(6)));
        assert_eq!(result.due_value_reporting, Some(n(48)));
        assert_eq!(result.proposed_value_reporting, Some(n(30)));
        assert_eq!(result.current_status, AllocationStatus::NotAllocated);
        assert_eq!(result.proposed_status, ProposedStatus::WouldBePartiallyAllocated);
    }

    #[test]
    fn test_unconvertible_values_are_none() {
        let annotator = ValueAnnotator::new(CurrencyConverter::new("USD", "EUR", ExchangeRateTable::new()));
        let allocation = LineAllocation {
            ranked: RankedDemandLine {
                priority_rank: 1,
                line: DemandLine {
                    line_id: 1,
                    item_code: "A".to_string(),
                    quantity_ordered: n(1),
                    quantity_dispatched: n(0),
                    quantity_allocated: n(0),
                    promised_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    document_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    unit_price: n(3),
                    currency_id: "ZAR".to_string(),
                    exchange_rate: n(0),
                },
            },
            eligible_quantity: n(1),
            proposed_allocation: n(1),
            prior_cumulative_demand: n(0),
            running_cumulative_demand: n(1),
            stock_remaining_before_this_line: n(1),
        };
        let result = annotator.annotate(allocation);
        assert_eq!(result.unit_price_reporting, None);
        assert_eq!(result.proposed_value_reporting, None);
        assert_eq!(result.proposed_status, ProposedStatus::WouldBeFullyAllocated);
    }
}
