use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scoopshop_core::{DomainError, DomainResult, Entity, ItemId, Money, OrderId, PaymentId};

use crate::number::OrderNumber;

/// Order status lifecycle.
///
/// Transitions are monotonically forward (`Pending < Paid < Shipped <
/// Delivered`, forward jumps allowed); the single non-forward edge is
/// `Pending -> Cancelled`, which is also the only edge that releases stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Paid => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            // Terminal; never compared by rank.
            OrderStatus::Cancelled => u8::MAX,
        }
    }

    /// Whether `self -> to` is a legal transition.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        match (self, to) {
            (OrderStatus::Pending, OrderStatus::Cancelled) => true,
            (_, OrderStatus::Cancelled) | (OrderStatus::Cancelled, _) => false,
            (from, to) => to.rank() > from.rank(),
        }
    }

    /// Uppercase wire string, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Who placed the order. Only the name is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerInfo {
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        Ok(Self {
            name,
            email: email.and_then(none_if_blank),
            phone: phone.and_then(none_if_blank),
            address: address.and_then(none_if_blank),
        })
    }
}

fn none_if_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// An order row.
///
/// `unit_price` is the price snapshot taken from the item at placement time;
/// it is never re-read from the catalog afterwards, so later price edits
/// leave historical orders untouched. `total_cost` is computed once at
/// construction and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_no: OrderNumber,
    pub customer: CustomerInfo,
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_cost: Money,
    pub payment_id: Option<PaymentId>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Order {
    /// Build a fresh `Pending` order with the given price snapshot and a
    /// precomputed total.
    pub fn pending(
        order_no: OrderNumber,
        customer: CustomerInfo,
        item_id: ItemId,
        quantity: i64,
        unit_price: Money,
        total_cost: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            order_no,
            customer,
            item_id,
            quantity,
            unit_price,
            total_cost,
            payment_id: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
