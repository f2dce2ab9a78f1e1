use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use scoopshop_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, backed by the in-memory stores, bound to an
        // ephemeral port.
        let app = build_app(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_item(client: &reqwest::Client, base_url: &str, stock: i64) -> String {
    let res = client
        .post(format!("{}/admin/items", base_url))
        .json(&json!({
            "title": "Vanilla Pint",
            "description": "Classic vanilla bean",
            "price_minor": 45_000,
            "stock": stock,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn stock_of(client: &reqwest::Client, base_url: &str, item_id: &str) -> i64 {
    let res = client
        .get(format!("{}/items/{}", base_url, item_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["stock"].as_i64().unwrap()
}

async fn place_order(
    client: &reqwest::Client,
    base_url: &str,
    item_id: &str,
    quantity: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/orders", base_url))
        .json(&json!({
            "customer_name": "Linh Tran",
            "phone": "+84 90 123 4567",
            "item_id": item_id,
            "quantity": quantity,
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_probe_responds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn item_create_then_public_read() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create_item(&client, &srv.base_url, 12).await;

    let res = client
        .get(format!("{}/items/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["title"], "Vanilla Pint");
    assert_eq!(item["price_minor"], 45_000);
    assert_eq!(item["currency"], "VND");
    assert_eq!(item["stock"], 12);

    let res = client
        .get(format!("{}/items?search=vanilla", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], id);
}

#[tokio::test]
async fn extreme_page_numbers_yield_an_empty_page() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_item(&client, &srv.base_url, 3).await;

    let res = client
        .get(format!(
            "{}/items?page={}&page_size=100",
            srv.base_url,
            i64::MAX
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn item_patch_updates_only_provided_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create_item(&client, &srv.base_url, 5).await;

    let res = client
        .put(format!("{}/admin/items/{}", srv.base_url, id))
        .json(&json!({ "price_minor": 52_000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["price_minor"], 52_000);
    assert_eq!(item["title"], "Vanilla Pint");
    assert_eq!(item["stock"], 5);
}

#[tokio::test]
async fn placing_an_order_reserves_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 10).await;

    let res = place_order(&client, &srv.base_url, &item_id, 3).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();

    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 7);

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["quantity"], 3);
    assert_eq!(order["unit_price_minor"], 45_000);
    assert_eq!(order["total_cost_minor"], 135_000);
    let order_no = order["order_no"].as_str().unwrap();
    assert!(order_no.starts_with("ORD-"), "order_no = {order_no}");
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 10).await;

    let res = place_order(&client, &srv.base_url, &item_id, 0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_quantity");

    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 10);
}

#[tokio::test]
async fn oversized_order_leaves_stock_untouched() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 4).await;

    let res = place_order(&client, &srv.base_url, &item_id, 5).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 4);
}

#[tokio::test]
async fn unknown_item_is_a_client_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = place_order(
        &client,
        &srv.base_url,
        "0198c5d2-9f00-7000-8000-000000000000",
        1,
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "item_not_found");
}

#[tokio::test]
async fn malformed_ids_are_rejected_up_front() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/items/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/orders/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/orders/0198c5d2-9f00-7000-8000-000000000000",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelling_restores_stock_and_is_one_shot() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 6).await;

    let res = place_order(&client, &srv.base_url, &item_id, 2).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();
    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 4);

    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 6);

    // Second cancel must not release stock again.
    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_state_transition");
    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 6);
}

#[tokio::test]
async fn paid_orders_cannot_be_cancelled() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 3).await;
    let res = place_order(&client, &srv.base_url, &item_id, 1).await;
    let body: serde_json::Value = res.json().await.unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/admin/orders/{}/status", srv.base_url, order_id))
        .json(&json!({
            "status": "PAID",
            "payment_id": "0198c5d2-9f00-7000-8000-000000000001",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // The reservation stays with the paid order.
    assert_eq!(stock_of(&client, &srv.base_url, &item_id).await, 2);

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["status"], "PAID");
    assert_eq!(
        order["payment_id"],
        "0198c5d2-9f00-7000-8000-000000000001"
    );
}

#[tokio::test]
async fn status_updates_refuse_backward_moves() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 3).await;
    let res = place_order(&client, &srv.base_url, &item_id, 1).await;
    let body: serde_json::Value = res.json().await.unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/admin/orders/{}/status", srv.base_url, order_id))
        .json(&json!({ "status": "SHIPPED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(format!("{}/admin/orders/{}/status", srv.base_url, order_id))
        .json(&json!({ "status": "PAID" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_state_transition");
}

#[tokio::test]
async fn admin_listing_filters_by_status() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 10).await;

    let mut first_id = None;
    for _ in 0..3 {
        let res = place_order(&client, &srv.base_url, &item_id, 1).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = res.json().await.unwrap();
        first_id.get_or_insert(body["order_id"].as_str().unwrap().to_string());
    }

    let first_id = first_id.unwrap();
    let res = client
        .put(format!("{}/admin/orders/{}/status", srv.base_url, first_id))
        .json(&json!({ "status": "PAID" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/admin/orders?status=PENDING", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["total"], 2);

    let res = client
        .get(format!("{}/admin/orders?status=BOGUS", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
