use serde::Deserialize;
use serde_json::json;

use scoopshop_catalog::{Item, ItemPage};
use scoopshop_orders::{Order, OrderPage};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub item_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub payment_id: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

/// Shared query string for the paged listings.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

// -------------------------
// Response JSON mapping
// -------------------------

pub fn item_to_json(item: &Item) -> serde_json::Value {
    json!({
        "id": item.id.to_string(),
        "title": item.title,
        "description": item.description,
        "price_minor": item.price.amount_minor,
        "currency": item.price.currency,
        "image_url": item.image_url,
        "stock": item.stock,
        "created_at": item.created_at,
        "updated_at": item.updated_at,
    })
}

pub fn item_page_to_json(page: &ItemPage) -> serde_json::Value {
    json!({
        "items": page.items.iter().map(item_to_json).collect::<Vec<_>>(),
        "page": page.page,
        "page_size": page.page_size,
        "total": page.total,
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    json!({
        "id": order.id.to_string(),
        "order_no": order.order_no.to_string(),
        "customer_name": order.customer.name,
        "email": order.customer.email,
        "phone": order.customer.phone,
        "address": order.customer.address,
        "item_id": order.item_id.to_string(),
        "quantity": order.quantity,
        "unit_price_minor": order.unit_price.amount_minor,
        "total_cost_minor": order.total_cost.amount_minor,
        "currency": order.unit_price.currency,
        "payment_id": order.payment_id.map(|p| p.to_string()),
        "status": order.status.as_str(),
        "created_at": order.created_at,
        "updated_at": order.updated_at,
    })
}

pub fn order_page_to_json(page: &OrderPage) -> serde_json::Value {
    json!({
        "orders": page.orders.iter().map(order_to_json).collect::<Vec<_>>(),
        "page": page.page,
        "page_size": page.page_size,
        "total": page.total,
    })
}
