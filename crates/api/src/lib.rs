//! `scoopshop-api` — HTTP surface for the ice-cream shop backend.

pub mod app;
