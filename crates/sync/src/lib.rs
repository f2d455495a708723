//! `ecomsync-sync`
//!
//! **Responsibility:** the one-way inventory push from the ERP to the
//! e-commerce platform.
//!
//! The process is written against collaborator traits ([`ports`]) so it stays
//! storage- and transport-agnostic; adapters live in `ecomsync-infra`.
//! Execution is strictly sequential: one row at a time, committed before the
//! next starts.

pub mod batch_log;
pub mod eligibility;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod pusher;

#[cfg(test)]
mod testing;

pub use batch_log::log_batch_status;
pub use eligibility::filter_to_flagged_items;
pub use error::{PlatformError, PortError, SyncError};
pub use orchestrator::{InventorySync, RunOutcome, DEFAULT_INTEGRATION};
pub use ports::{
    ErpGateway, InventoryPlatform, InventorySource, ItemCatalog, PlatformVariant, RunGate,
    SettingsSource, SyncLog, SyncStatusStore, UnitOfWork,
};
pub use pusher::{push_inventory, PushReport, BATCH_SIZE};
