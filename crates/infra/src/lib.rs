//! `scoopshop-infra` — storage implementations for the catalog and order
//! ports.
//!
//! Two backends:
//! - [`postgres`]: the production implementation. The stock reservation
//!   primitive is a single conditional `UPDATE`, so no application-level
//!   locking exists anywhere in the system.
//! - [`memory`]: `RwLock<HashMap>` stores for tests and local development.

pub mod memory;
pub mod postgres;


pub use memory::{InMemoryCatalog, InMemoryOrderStore};
pub use postgres::{PostgresCatalog, PostgresOrderStore, connect};
