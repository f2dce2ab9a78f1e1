//! Storage ports consumed by the order workflow.
//!
//! The workflow owns no storage of its own; it talks to an item catalog,
//! a stock ledger and an order record store through these traits. The
//! implementations live in `scoopshop-infra`.

use async_trait::async_trait;

use scoopshop_catalog::Item;
use scoopshop_core::{ItemId, OrderId, PaymentId};

pub use scoopshop_core::StorageError;

use crate::number::OrderNumber;
use crate::order::{Order, OrderStatus};

/// Read access to the item catalog.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StorageError>;
}

/// The stock reservation primitive.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Atomically apply `stock = stock + delta` **only if** the result stays
    /// non-negative; otherwise the call has no effect and returns
    /// `Ok(false)`.
    ///
    /// Contract: this must be a single atomic conditional update at the
    /// storage layer (`UPDATE ... WHERE stock + delta >= 0` semantics), not
    /// a read-modify-write, because concurrent placements against the same
    /// item must not both succeed when only one unit remains. `Ok(false)`
    /// is a normal outcome, to be treated as lost contention.
    async fn adjust_stock(&self, item_id: ItemId, delta: i64) -> Result<bool, StorageError>;
}

/// Paged order listing query (1-based page, clamped).
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub page: i64,
    pub page_size: i64,
}

impl OrderQuery {
    pub fn clamped(self) -> Self {
        Self {
            status: self.status,
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        // Page is client-supplied; saturate instead of overflowing on
        // absurd values. A saturated OFFSET just yields an empty page.
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of orders plus the total match count.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Order record persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), StorageError>;

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError>;

    /// Conditional status transition: applied only while the current status
    /// equals `from`; returns `Ok(false)` when the precondition no longer
    /// holds (e.g. a concurrent transition won). A `payment_id`, when given,
    /// is attached in the same write; an existing one is never overwritten
    /// with `None`.
    async fn transition(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        payment_id: Option<PaymentId>,
    ) -> Result<bool, StorageError>;

    async fn order_number_exists(&self, number: &OrderNumber) -> Result<bool, StorageError>;

    async fn list(&self, query: OrderQuery) -> Result<OrderPage, StorageError>;
}
