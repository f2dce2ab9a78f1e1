//! `scoopshop-orders` — order placement with atomic stock reservation and
//! compensating release.
//!
//! This is the one multi-step, multi-entity workflow in the system. The
//! ordering of its steps is load-bearing:
//!
//! 1. stock is reserved *before* the order row is written, so two concurrent
//!    requests for the last unit cannot both observe success;
//! 2. the order number is generated *after* reservation, and any failure
//!    past that point releases the reservation explicitly.
//!
//! Storage is reached only through the ports in [`ports`]; the reservation
//! primitive must be a single atomic conditional update at the storage
//! layer, never an application-level read-modify-write.

pub mod error;
pub mod number;
pub mod order;
pub mod ports;
pub mod service;

pub use error::OrderError;
pub use number::{OrderNumber, OrderNumberGenerator};
pub use order::{CustomerInfo, Order, OrderStatus};
pub use ports::{ItemCatalog, OrderPage, OrderQuery, OrderStore, StockLedger, StorageError};
pub use service::{OrderService, PlaceOrder};
