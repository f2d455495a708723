//! Inventory push domain module.
//!
//! This crate contains the business rules for pushing ERP stock to the
//! e-commerce platform, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod location;
pub mod log;
pub mod quantity;
pub mod row;
pub mod schedule;
pub mod settings;
pub mod summary;

pub use location::{resolve_default_location, LocationError, LocationMap, WarehouseMapping};
pub use log::{LogStatus, SyncLogEntry, INVENTORY_SYNC_METHOD};
pub use quantity::{available_quantity, int_cast};
pub use row::{InventoryRow, RowOutcome, RowReport, RowStatus};
pub use schedule::is_due;
pub use settings::SyncSettings;
pub use summary::BatchSummary;
