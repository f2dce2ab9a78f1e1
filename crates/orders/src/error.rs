use thiserror::Error;

use scoopshop_core::StorageError;

use crate::order::OrderStatus;

/// Errors of the order workflow.
///
/// `InsufficientStock` is an expected-under-load outcome, not an exceptional
/// one; `OrderNumberExhausted` and `Storage(Unavailable)` are transient and
/// retryable by the caller. The workflow never auto-retries a placement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    #[error("item does not exist")]
    ItemNotFound,

    #[error("order does not exist")]
    OrderNotFound,

    #[error("not enough stock to fulfil the requested quantity")]
    InsufficientStock,

    #[error("could not allocate a unique order number; please retry")]
    OrderNumberExhausted,

    #[error("invalid order status transition: {from} -> {to}")]
    InvalidStateTransition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
