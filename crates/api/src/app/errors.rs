use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use scoopshop_core::{DomainError, StorageError};
use scoopshop_orders::OrderError;

/// Map workflow errors to HTTP. Every client-correctable kind is a 400;
/// lookup misses on reads are 404; storage failures are 500.
pub fn order_error_to_response(err: OrderError) -> axum::response::Response {
    match err {
        OrderError::InvalidQuantity => {
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", err.to_string())
        }
        OrderError::ItemNotFound => {
            json_error(StatusCode::BAD_REQUEST, "item_not_found", err.to_string())
        }
        OrderError::OrderNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        OrderError::InsufficientStock => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", err.to_string())
        }
        OrderError::OrderNumberExhausted => json_error(
            StatusCode::BAD_REQUEST,
            "order_number_exhausted",
            err.to_string(),
        ),
        OrderError::InvalidStateTransition { .. } => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_state_transition",
            err.to_string(),
        ),
        OrderError::Storage(e) => storage_error_to_response(e),
    }
}

pub fn storage_error_to_response(err: StorageError) -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "storage_error",
        err.to_string(),
    )
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        other => json_error(StatusCode::BAD_REQUEST, "validation_error", other.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
