//! Infrastructure layer: ERP document store, platform client, audit sinks,
//! configuration, background runner.

pub mod audit_log;
pub mod config;
pub mod erp;
pub mod platform;
pub mod runner;
pub mod shopify;


pub use audit_log::{InMemorySyncLog, JsonlSyncLog};
pub use config::{AppConfig, ConfigError};
pub use erp::{ErpSnapshot, ErpStore, ErpStoreError};
pub use platform::InMemoryPlatform;
pub use runner::{InventorySyncRunner, InventorySyncRunnerHandle};
pub use shopify::{ShopifyClient, ShopifyConfig};
