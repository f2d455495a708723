//! `ecomsync-core`: shared building blocks for the ERP → e-commerce integration.
//!
//! This crate contains **pure** primitives (no infrastructure concerns): typed
//! identifiers and the domain error model.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{
    EcomItemName, InventoryItemId, ItemCode, LocationId, LogEntryId, VariantId, WarehouseId,
};
