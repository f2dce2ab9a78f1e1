//! The order placement workflow and its compensation paths.

use std::sync::Arc;

use tracing::instrument;

use scoopshop_core::{ItemId, OrderId, PaymentId};

use crate::error::OrderError;
use crate::number::OrderNumberGenerator;
use crate::order::{CustomerInfo, Order, OrderStatus};
use crate::ports::{ItemCatalog, OrderPage, OrderQuery, OrderStore, StockLedger};

/// A validated purchase request.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer: CustomerInfo,
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Orchestrates validation, stock reservation, order numbering and
/// persistence.
///
/// The service holds no cross-request state; any number of placements and
/// cancellations may run concurrently, and the only shared resource is the
/// stock counter behind [`StockLedger`].
pub struct OrderService {
    catalog: Arc<dyn ItemCatalog>,
    ledger: Arc<dyn StockLedger>,
    orders: Arc<dyn OrderStore>,
    numbers: OrderNumberGenerator,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn ItemCatalog>,
        ledger: Arc<dyn StockLedger>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            orders,
            numbers: OrderNumberGenerator::new(),
        }
    }

    /// Place an order: validate, reserve stock, number, persist.
    ///
    /// Stock is reserved before anything else has a side effect; every
    /// failure after the reservation releases it before returning.
    #[instrument(skip(self, request), fields(item_id = %request.item_id, quantity = request.quantity))]
    pub async fn place_order(&self, request: PlaceOrder) -> Result<OrderId, OrderError> {
        if request.quantity <= 0 {
            return Err(OrderError::InvalidQuantity);
        }

        let item = self
            .catalog
            .get_item(request.item_id)
            .await?
            .ok_or(OrderError::ItemNotFound)?;

        // Advisory pre-check; the ledger call below is authoritative.
        if item.stock < request.quantity {
            return Err(OrderError::InsufficientStock);
        }

        // A total that overflows i64 minor units is a nonsense quantity.
        // Checked here, before the reservation, so the failure has no side
        // effects to unwind.
        let total_cost = item
            .price
            .times(request.quantity)
            .map_err(|_| OrderError::InvalidQuantity)?;

        let reserved = self
            .ledger
            .adjust_stock(request.item_id, -request.quantity)
            .await?;
        if !reserved {
            // Lost the race to a concurrent order; nothing was reserved, so
            // there is nothing to compensate.
            return Err(OrderError::InsufficientStock);
        }

        let order_no = match self.numbers.generate(self.orders.as_ref()).await {
            Ok(number) => number,
            Err(err) => {
                self.release(request.item_id, request.quantity).await;
                return Err(err);
            }
        };

        let order = Order::pending(
            order_no,
            request.customer,
            request.item_id,
            request.quantity,
            item.price,
            total_cost,
        );

        if let Err(err) = self.orders.insert(&order).await {
            self.release(request.item_id, request.quantity).await;
            return Err(err.into());
        }

        tracing::info!(order_id = %order.id, order_no = %order.order_no, "order placed");
        Ok(order.id)
    }

    /// Cancel a still-`Pending` order and release its reservation.
    ///
    /// Status first: once the conditional `Pending -> Cancelled` transition
    /// lands, the order can never be cancelled twice, which makes the stock
    /// release below safe to retry on its own.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<(), OrderError> {
        let order = self.orders.get(id).await?.ok_or(OrderError::OrderNotFound)?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidStateTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        let moved = self
            .orders
            .transition(id, OrderStatus::Pending, OrderStatus::Cancelled, None)
            .await?;
        if !moved {
            // A concurrent transition won between the read and the write.
            let from = self
                .orders
                .get(id)
                .await?
                .map(|o| o.status)
                .unwrap_or(OrderStatus::Cancelled);
            return Err(OrderError::InvalidStateTransition {
                from,
                to: OrderStatus::Cancelled,
            });
        }

        self.release(order.item_id, order.quantity).await;
        tracing::info!(order_no = %order.order_no, "order cancelled");
        Ok(())
    }

    /// Admin status update. Forward transitions only; `Cancelled` routes
    /// through [`cancel_order`](Self::cancel_order) so the reservation is
    /// released. A `payment_id` is attached only on the `Paid` transition
    /// and ignored otherwise.
    #[instrument(skip(self), fields(order_id = %id, to = %to))]
    pub async fn update_status(
        &self,
        id: OrderId,
        to: OrderStatus,
        payment_id: Option<PaymentId>,
    ) -> Result<(), OrderError> {
        if to == OrderStatus::Cancelled {
            return self.cancel_order(id).await;
        }

        let payment_id = payment_id.filter(|_| to == OrderStatus::Paid);

        let order = self.orders.get(id).await?.ok_or(OrderError::OrderNotFound)?;
        if !order.status.can_transition_to(to) {
            return Err(OrderError::InvalidStateTransition {
                from: order.status,
                to,
            });
        }

        let moved = self
            .orders
            .transition(id, order.status, to, payment_id)
            .await?;
        if !moved {
            let from = self
                .orders
                .get(id)
                .await?
                .map(|o| o.status)
                .unwrap_or(order.status);
            return Err(OrderError::InvalidStateTransition { from, to });
        }
        Ok(())
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::OrderNotFound)
    }

    pub async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, OrderError> {
        Ok(self.orders.list(query.clamped()).await?)
    }

    /// Compensating release of a confirmed reservation.
    ///
    /// A positive delta cannot violate the ledger's non-negativity guard, so
    /// any failure here is infrastructure trouble: retried once, then logged
    /// as a durable inconsistency. Silently dropping it would corrupt the
    /// stock invariant permanently, so this is the one operator-alerting
    /// condition in the workflow.
    async fn release(&self, item_id: ItemId, quantity: i64) {
        match self.ledger.adjust_stock(item_id, quantity).await {
            Ok(true) => return,
            Ok(false) => {
                // Only possible if the item row vanished underneath us.
            }
            Err(err) => {
                tracing::warn!(%item_id, quantity, error = %err, "stock release failed; retrying once");
                if let Ok(true) = self.ledger.adjust_stock(item_id, quantity).await {
                    return;
                }
            }
        }
        tracing::error!(
            %item_id,
            quantity,
            "stock release failed after a confirmed reservation; manual reconciliation required"
        );
    }
}
