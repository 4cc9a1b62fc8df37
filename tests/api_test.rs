use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use stock_allocation_rust::{api, AllocationConfig, AllocationEngine};
use tower::ServiceExt;

fn app() -> axum::Router {
    let routes = api::snapshot_routes(Arc::new(AllocationEngine::new(AllocationConfig::default())));
    api::limit_concurrency(routes, 1)
}

async fn post_json(body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/allocation/run")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn line(id: i64, item: &str, ordered: &str, promised: &str) -> Value {
    json!({
        "line_id": id,
        "item_code": item,
        "quantity_ordered": ordered,
        "quantity_dispatched": "0",
        "promised_date": promised,
        "document_date": "2024-01-02T08:30:00",
        "unit_price": "2.5",
        "currency_id": "PLN",
        "exchange_rate": "4"
    })
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_run_posted_snapshot() {
    let (status, body) = post_json(json!({
        "demand_lines": [
            line(1, "A", "8", "2024-03-02"),
            line(2, "A", "8", "2024-03-01"),
        ],
        "stock_positions": [{ "item_code": "A", "available_quantity": "10" }],
        "exchange_rates": [{ "from_currency": "EUR", "to_currency": "USD", "rate": "1.2" }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let results = body["run"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["line_id"], json!(2));
    assert_eq!(results[0]["proposed_status"], json!("Would be Fully Allocated"));
    assert_eq!(results[1]["line_id"], json!(1));
    assert_eq!(results[1]["current_status"], json!("Not Allocated"));
    assert_eq!(results[1]["proposed_status"], json!("Would be Partially Allocated"));
}

#[tokio::test]
async fn test_unconvertible_values_are_null() {
    let (status, body) = post_json(json!({
        "demand_lines": [line(1, "A", "1", "2024-03-01")],
        "stock_positions": []
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["run"]["results"][0];
    assert!(result["unit_price_reporting"].is_null());
    assert!(result["proposed_value_reporting"].is_null());
}

#[tokio::test]
async fn test_duplicate_line_id_is_unprocessable() {
    let (status, body) = post_json(json!({
        "demand_lines": [
            line(1, "A", "1", "2024-03-01"),
            line(1, "A", "2", "2024-03-02"),
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
    assert!(body["run"].is_null());
}

#[tokio::test]
async fn test_dateless_line_is_excluded_not_rejected() {
    let mut dateless = line(2, "A", "4", "2024-03-01");
    dateless["promised_date"] = Value::Null;
    let mut garbled = line(3, "A", "4", "2024-03-01");
    garbled["document_date"] = json!("yesterday");

    let (status, body) = post_json(json!({
        "demand_lines": [line(1, "A", "6", "2024-03-05"), dateless, garbled],
        "stock_positions": [{ "item_code": "A", "available_quantity": "10" }]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["run"]["excluded_line_ids"], json!([2, 3]));
    let results = body["run"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["line_id"], json!(1));
    assert_eq!(results[0]["priority_rank"], json!(1));
    assert_eq!(results[0]["proposed_status"], json!("Would be Fully Allocated"));
}

#[tokio::test]
async fn test_sequential_requests_pass_concurrency_limit() {
    let app = app();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
