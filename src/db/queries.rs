use crate::models::{AllocationSnapshot, DemandLineRecord, ExchangeRate, StockPosition};
use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// 查询需求快照 (item_codes 为空时查询全部)
pub async fn list_demand_lines(
    pool: &PgPool,
    item_codes: &[String],
) -> Result<Vec<DemandLineRecord>, sqlx::Error> {
    sqlx::query_as::<_, DemandLineRecord>(
        r#"
        SELECT line_id, item_code,
               quantity_ordered, quantity_dispatched, quantity_allocated,
               promised_date, document_date,
               unit_price, currency_id, exchange_rate
        FROM t_alloc_demand_line
        WHERE cardinality($1::text[]) = 0 OR item_code = ANY($1)
        "#
    )
    .bind(item_codes)
    .fetch_all(pool)
    .await
}

/// 查询库存头寸
pub async fn list_stock_positions(
    pool: &PgPool,
    item_codes: &[String],
) -> Result<Vec<StockPosition>, sqlx::Error> {
    sqlx::query_as::<_, (String, BigDecimal)>(
        r#"
        SELECT item_code, coalesce(available_quantity, 0) as available_quantity
        FROM t_alloc_stock_position
        WHERE cardinality($1::text[]) = 0 OR item_code = ANY($1)
        "#
    )
    .bind(item_codes)
    .fetch_all(pool)
    .await
    .map(|rows| {
        rows.into_iter()
            .map(|(item_code, available_quantity)| StockPosition { item_code, available_quantity })
            .collect()
    })
}

/// 查询系统汇率
pub async fn list_exchange_rates(pool: &PgPool) -> Result<Vec<ExchangeRate>, sqlx::Error> {
    sqlx::query_as::<_, (String, String, BigDecimal)>(
        r#"
        SELECT from_currency, to_currency, rate
        FROM t_alloc_exchange_rate
        WHERE rate IS NOT NULL
        "#
    )
    .fetch_all(pool)
    .await
    .map(|rows| {
        rows.into_iter()
            .map(|(from_currency, to_currency, rate)| ExchangeRate { from_currency, to_currency, rate })
            .collect()
    })
}

/// 读取一次分配运行所需的完整快照
pub async fn load_snapshot(
    pool: &PgPool,
    item_codes: &[String],
) -> Result<AllocationSnapshot, sqlx::Error> {
    let start_time = std::time::Instant::now();

    let demand_lines = list_demand_lines(pool, item_codes).await?;
    let stock_positions = list_stock_positions(pool, item_codes).await?;
    let exchange_rates = list_exchange_rates(pool).await?;

    tracing::info!(
        "快照加载完成: 需求行 {}, 库存 {}, 汇率 {}, 耗时: {:?}",
        demand_lines.len(),
        stock_positions.len(),
        exchange_rates.len(),
        start_time.elapsed()
    );

    Ok(AllocationSnapshot {
        demand_lines,
        stock_positions,
        exchange_rates,
    })
}
