use std::sync::Arc;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use ordo_api::{app, AppState};
use ordo_core::{Order, OrderStore, ProductInfoClient, ProductSnapshot};
use ordo_order::OrderWorkflow;
use ordo_store::{InMemoryEventPublisher, InMemoryOrderCache, InMemoryOrderStore};

struct FixedCatalog;

#[async_trait]
impl ProductInfoClient for FixedCatalog {
    async fn fetch_product(
        &self,
        product_id: &str,
    ) -> Result<ProductSnapshot, Box<dyn std::error::Error + Send + Sync>> {
        let available_qty = match product_id {
            "valid-product" => 100,
            "no-stock" => 1,
            _ => return Err("product service returned status: 404 Not Found".into()),
        };
        Ok(ProductSnapshot {
            id: product_id.to_string(),
            name: "Test".to_string(),
            unit_price: 10.0,
            available_qty,
        })
    }
}

struct BrokenStore;

#[async_trait]
impl OrderStore for BrokenStore {
    async fn create_order(&self, _order: &Order) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("database is down".into())
    }

    async fn list_orders_by_product(
        &self,
        _product_id: &str,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Err("database is down".into())
    }
}

fn test_app(store: Arc<dyn OrderStore>) -> (Router, Arc<InMemoryEventPublisher>) {
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let workflow = OrderWorkflow::new(
        Arc::new(FixedCatalog),
        store,
        Arc::new(InMemoryOrderCache::new()),
        publisher.clone(),
    );
    (app(AppState::new(workflow)), publisher)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_order(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_order_returns_created_order() {
    let (app, publisher) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (status, body) = send(&app, post_order(json!({"productId": "valid-product", "quantity": 5}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["productId"], "valid-product");
    assert_eq!(body["quantity"], 5);
    assert_eq!(body["totalPrice"], 50.0);
    assert_eq!(body["status"], "PENDING");
    assert!(body["id"].is_string());
    assert_eq!(publisher.published().await.len(), 1);
}

#[tokio::test]
async fn test_insufficient_stock_is_bad_request() {
    let (app, publisher) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (status, body) = send(&app, post_order(json!({"productId": "no-stock", "quantity": 5}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "insufficient stock"}));
    assert!(publisher.published().await.is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (app, _) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (status, body) = send(&app, post_order(json!({"productId": "ghost", "quantity": 1}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "product not found or service unavailable"}));
}

#[tokio::test]
async fn test_zero_quantity_is_bad_request() {
    let (app, _) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (status, _) = send(&app, post_order(json!({"productId": "valid-product", "quantity": 0}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (app, publisher) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (status, _) = send(&app, post_order(json!({"productId": "valid-product"}))).await;

    assert!(status.is_client_error());
    assert!(publisher.published().await.is_empty());
}

#[tokio::test]
async fn test_store_failure_hides_details() {
    let (app, publisher) = test_app(Arc::new(BrokenStore));

    let (status, body) = send(&app, post_order(json!({"productId": "valid-product", "quantity": 1}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal Server Error"}));
    assert!(publisher.published().await.is_empty());

    let (status, _) = send(&app, get("/orders/product/valid-product")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_list_orders_by_product() {
    let (app, _) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (_, first) = send(&app, post_order(json!({"productId": "valid-product", "quantity": 1}))).await;
    let (_, second) = send(&app, post_order(json!({"productId": "valid-product", "quantity": 2}))).await;

    let (status, body) = send(&app, get("/orders/product/valid-product")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([first, second]));

    let (status, body) = send(&app, get("/orders/product/no-orders-yet")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(Arc::new(InMemoryOrderStore::new()));

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
