//! ERP document store.
//!
//! Holds the documents the inventory push reads (settings, items, ecom item
//! mappings, stock bins) and the two timestamps it writes (per-item
//! `inventory_synced_on`, run-level `last_inventory_sync`).

pub mod snapshot;
pub mod store;

pub use snapshot::{EcommerceItem, ErpItem, ErpSnapshot, StockBin};
pub use store::{ErpStore, ErpStoreError};
