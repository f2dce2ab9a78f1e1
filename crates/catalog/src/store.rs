//! Storage port for catalog CRUD.

use async_trait::async_trait;

use scoopshop_core::{ItemId, StorageError};

use crate::item::Item;

/// Paged listing query. Page numbers are 1-based; out-of-range values are
/// clamped rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub search: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl ItemQuery {
    pub fn clamped(self) -> Self {
        Self {
            search: self.search.filter(|s| !s.trim().is_empty()),
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

/// One page of items plus the total match count.
#[derive(Debug, Clone)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Catalog persistence port.
///
/// Note the deliberate absence of any "set stock" style write here beyond
/// `insert`/`update`: racing stock mutations go through the order workflow's
/// ledger primitive only.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, StorageError>;

    async fn list(&self, query: ItemQuery) -> Result<ItemPage, StorageError>;

    async fn insert(&self, item: &Item) -> Result<(), StorageError>;

    /// Write back a patched item. Returns `false` if the id is unknown.
    /// Currency is fixed at creation and not part of the write.
    async fn update(&self, item: &Item) -> Result<bool, StorageError>;
}
