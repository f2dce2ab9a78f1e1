//! `scoopshop-catalog` — the sellable item domain.
//!
//! Items are plain state-stored entities: the catalog owns their titles,
//! prices and stock counts. Stock is *mutated* only through the order
//! workflow's ledger primitive (see `scoopshop-orders`); this crate only
//! reads it and sets the initial count.

pub mod item;
pub mod store;

pub use item::{Item, ItemPatch, NewItem};
pub use store::{ItemPage, ItemQuery, ItemStore};
