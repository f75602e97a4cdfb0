//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use ledger::InMemoryLedgerStore;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> Router {
    let store = InMemoryLedgerStore::new();
    let (state, _aggregator) = api::create_default_state(store, 10);
    api::create_app(state, get_metrics_handle())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Registers one product and one warehouse so transactions pass the
/// reference checks.
async fn seed_master_data(app: &Router) {
    let (status, _) = post_json(
        app,
        "/products",
        json!({ "sku": "SKU-1", "name": "Widget", "price": 19.99, "cost": 12.50 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post_json(
        app,
        "/warehouses",
        json!({ "name": "Main", "code": "WH-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_submit_transaction_assigns_sequence() {
    let app = setup();
    seed_master_data(&app).await;

    let (status, body) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "in",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 10,
            "reference": "PO-1001"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sequence_id"], 1);
    assert_eq!(body["type"], "in");
    assert_eq!(body["product_sku"], "SKU-1");
    assert_eq!(body["quantity"], 10);
    assert_eq!(body["reference"], "PO-1001");

    let (status, body) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "out",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 4
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sequence_id"], 2);
}

#[tokio::test]
async fn test_unknown_reference_is_bad_request() {
    let app = setup();
    seed_master_data(&app).await;

    let (status, body) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "in",
            "product_sku": "NO-SUCH-SKU",
            "warehouse_code": "WH-1",
            "quantity": 5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("unknown product_sku")
    );
}

#[tokio::test]
async fn test_unknown_type_is_bad_request() {
    let app = setup();
    seed_master_data(&app).await;

    let (status, body) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "transfer",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("unknown transaction type")
    );
}

#[tokio::test]
async fn test_overdraw_is_conflict() {
    let app = setup();
    seed_master_data(&app).await;

    let (status, _) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "in",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 3
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "out",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("insufficient stock")
    );

    // The rejected submission consumed no sequence number.
    let (status, body) = post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "out",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 3
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sequence_id"], 2);
}

#[tokio::test]
async fn test_stock_listing_shows_nonzero_cells_only() {
    let app = setup();
    seed_master_data(&app).await;

    post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "in",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 6
        }),
    )
    .await;

    let (status, body) = get_json(&app, "/inventory/stock").await;
    assert_eq!(status, StatusCode::OK);

    let cells = body.as_array().unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0]["product_sku"], "SKU-1");
    assert_eq!(cells[0]["warehouse_code"], "WH-1");
    assert_eq!(cells[0]["on_hand"], 6);
    assert_eq!(cells[0]["reserved"], 0);

    // Draining the cell removes it from the stock-levels view, but the
    // dashboard still flags it as low stock.
    post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "out",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 6
        }),
    )
    .await;

    let (status, body) = get_json(&app, "/inventory/stock").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = get_json(&app, "/dashboard").await;
    let low_stock = body["low_stock"].as_array().unwrap();
    assert_eq!(low_stock.len(), 1);
    assert_eq!(low_stock[0]["product_sku"], "SKU-1");
    assert_eq!(low_stock[0]["on_hand"], 0);
}

#[tokio::test]
async fn test_dashboard_totals_and_low_stock() {
    let app = setup();
    seed_master_data(&app).await;

    let (status, _) = post_json(
        &app,
        "/customers",
        json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // 7 on hand is below the configured threshold of 10.
    post_json(
        &app,
        "/inventory/transactions",
        json!({
            "type": "in",
            "product_sku": "SKU-1",
            "warehouse_code": "WH-1",
            "quantity": 7
        }),
    )
    .await;

    let (status, body) = get_json(&app, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["totals"]["products"], 1);
    assert_eq!(body["totals"]["customers"], 1);
    assert_eq!(body["totals"]["suppliers"], 0);
    assert_eq!(body["totals"]["stock_items"], 1);

    let low_stock = body["low_stock"].as_array().unwrap();
    assert_eq!(low_stock.len(), 1);
    assert_eq!(low_stock[0]["product_sku"], "SKU-1");
    assert_eq!(low_stock[0]["on_hand"], 7);
}

#[tokio::test]
async fn test_duplicate_sku_is_bad_request() {
    let app = setup();

    let (status, _) = post_json(
        &app,
        "/products",
        json!({ "sku": "SKU-1", "name": "Widget", "price": 10.0, "cost": 6.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/products",
        json!({ "sku": "SKU-1", "name": "Widget again", "price": 9.0, "cost": 5.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate sku"));
}

#[tokio::test]
async fn test_master_data_listing() {
    let app = setup();

    post_json(
        &app,
        "/suppliers",
        json!({ "name": "Acme", "email": "sales@acme.example" }),
    )
    .await;
    post_json(&app, "/taxes", json!({ "name": "VAT", "rate": 0.21 })).await;

    let (status, body) = get_json(&app, "/suppliers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Acme");

    let (status, body) = get_json(&app, "/taxes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["rate"], 0.21);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
