use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scoopshop_core::{DomainError, DomainResult, Entity, ItemId, Money};

/// A sellable catalog item.
///
/// Invariant: `stock >= 0` at all times. The only writer of `stock` after
/// creation is the stock ledger's conditional adjustment; nothing in this
/// crate does a read-then-write on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub price: Money,
    pub image_url: Option<String>,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Item {
    /// Apply a partial update, patching only the provided fields.
    pub fn apply_patch(&mut self, patch: ItemPatch) -> DomainResult<()> {
        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::validation("title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = none_if_blank(description);
        }
        if let Some(amount) = patch.price_minor {
            if amount < 0 {
                return Err(DomainError::validation("price cannot be negative"));
            }
            // Currency is fixed at creation; only the amount moves.
            self.price.amount_minor = amount;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = none_if_blank(image_url);
        }
        if let Some(stock) = patch.stock {
            if stock < 0 {
                return Err(DomainError::validation("stock cannot be negative"));
            }
            self.stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Validated payload for creating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price: Money,
    pub image_url: Option<String>,
    pub stock: i64,
}

impl NewItem {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        price: Money,
        image_url: Option<String>,
        stock: i64,
    ) -> DomainResult<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if price.is_negative() {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        Ok(Self {
            title,
            description: description.and_then(none_if_blank),
            price,
            image_url: image_url.and_then(none_if_blank),
            stock,
        })
    }

    /// Materialize the item with a fresh id and timestamps.
    pub fn into_item(self) -> Item {
        let now = Utc::now();
        Item {
            id: ItemId::new(),
            title: self.title,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            stock: self.stock,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an item; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_minor: Option<i64>,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
}

fn none_if_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
