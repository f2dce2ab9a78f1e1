//! In-memory stores for tests and local development.
//!
//! The ledger's adjustment takes the write lock for the whole
//! check-and-apply, which gives the same "at most one winner for the last
//! unit" guarantee the conditional UPDATE gives in Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use scoopshop_catalog::{Item, ItemPage, ItemQuery, ItemStore};
use scoopshop_core::{ItemId, OrderId, PaymentId, StorageError};
use scoopshop_orders::ports::{
    ItemCatalog, OrderPage, OrderQuery, OrderStore, StockLedger,
};
use scoopshop_orders::{Order, OrderNumber, OrderStatus};

fn poisoned() -> StorageError {
    StorageError::backend("lock poisoned")
}

/// In-memory `items` table.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: insert without going through the async port.
    #[cfg(test)]
    pub(crate) fn seed(&self, item: Item) {
        self.items.write().expect("lock poisoned").insert(item.id, item);
    }

    /// Test helper: current stock of an item, if present.
    #[cfg(test)]
    pub(crate) fn stock_of(&self, id: ItemId) -> Option<i64> {
        self.items.read().expect("lock poisoned").get(&id).map(|i| i.stock)
    }
}

#[async_trait]
impl ItemStore for InMemoryCatalog {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, StorageError> {
        Ok(self.items.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    async fn list(&self, query: ItemQuery) -> Result<ItemPage, StorageError> {
        let query = query.clamped();
        let items = self.items.read().map_err(|_| poisoned())?;
        let mut matched: Vec<Item> = items
            .values()
            .filter(|item| match &query.search {
                Some(needle) => item.title.to_lowercase().contains(&needle.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.to_string().cmp(&b.id.to_string())));
        let total = matched.len() as i64;
        let page_items = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();
        Ok(ItemPage {
            items: page_items,
            page: query.page,
            page_size: query.page_size,
            total,
        })
    }

    async fn insert(&self, item: &Item) -> Result<(), StorageError> {
        self.items
            .write()
            .map_err(|_| poisoned())?
            .insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<bool, StorageError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        match items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ItemCatalog for InMemoryCatalog {
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StorageError> {
        ItemStore::get(self, id).await
    }
}

#[async_trait]
impl StockLedger for InMemoryCatalog {
    async fn adjust_stock(&self, item_id: ItemId, delta: i64) -> Result<bool, StorageError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        let Some(item) = items.get_mut(&item_id) else {
            return Ok(false);
        };
        let next = item.stock + delta;
        if next < 0 {
            return Ok(false);
        }
        item.stock = next;
        item.updated_at = Utc::now();
        Ok(true)
    }
}

/// In-memory `item_orders` table.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), StorageError> {
        self.orders
            .write()
            .map_err(|_| poisoned())?
            .insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        Ok(self.orders.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        payment_id: Option<PaymentId>,
    ) -> Result<bool, StorageError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        match orders.get_mut(&id) {
            Some(order) if order.status == from => {
                order.status = to;
                if payment_id.is_some() {
                    order.payment_id = payment_id;
                }
                order.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn order_number_exists(&self, number: &OrderNumber) -> Result<bool, StorageError> {
        Ok(self
            .orders
            .read()
            .map_err(|_| poisoned())?
            .values()
            .any(|order| &order.order_no == number))
    }

    async fn list(&self, query: OrderQuery) -> Result<OrderPage, StorageError> {
        let query = query.clamped();
        let orders = self.orders.read().map_err(|_| poisoned())?;
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|order| query.status.is_none_or(|s| order.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.to_string().cmp(&b.id.to_string())));
        let total = matched.len() as i64;
        let page_orders = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();
        Ok(OrderPage {
            orders: page_orders,
            page: query.page,
            page_size: query.page_size,
            total,
        })
    }
}
