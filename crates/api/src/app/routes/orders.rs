use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use scoopshop_core::{ItemId, OrderId, PaymentId};
use scoopshop_orders::{CustomerInfo, OrderQuery, OrderStatus, PlaceOrder};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Storefront order surface: place, look up, cancel.
pub fn public_router() -> Router {
    Router::new()
        .route("/", post(place_order))
        .route("/:id", get(get_order))
        .route("/:id/cancel", post(cancel_order))
}

/// Back-office listing and fulfilment transitions.
pub fn admin_router() -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id/status", put(update_status))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let item_id: ItemId = match body.item_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    let customer = match CustomerInfo::new(body.customer_name, body.email, body.phone, body.address)
    {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let request = PlaceOrder {
        customer,
        item_id,
        quantity: body.quantity,
    };

    match services.orders().place_order(request).await {
        Ok(order_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "order_id": order_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.orders().get_order(id).await {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.orders().cancel_order(id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({}))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<OrderStatus>() {
            Ok(s) => Some(s),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_status",
                    format!("unknown order status: {raw}"),
                );
            }
        },
    };

    match services
        .orders()
        .list_orders(OrderQuery {
            status,
            page: query.page,
            page_size: query.page_size,
        })
        .await
    {
        Ok(page) => (StatusCode::OK, Json(dto::order_page_to_json(&page))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    let to: OrderStatus = match body.status.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_status",
                format!("unknown order status: {}", body.status),
            );
        }
    };

    let payment_id: Option<PaymentId> = match body.payment_id.as_deref() {
        None => None,
        Some(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid payment id",
                );
            }
        },
    };

    match services.orders().update_status(id, to, payment_id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({}))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}
