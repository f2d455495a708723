//! Integration settings document (owned by the ERP, read-only here).

use serde::{Deserialize, Serialize};

use ecomsync_core::id::blank_as_none;
use ecomsync_core::WarehouseId;

use crate::location::{LocationMap, WarehouseMapping};

/// Default interval between scheduled pushes, in minutes.
pub const DEFAULT_SYNC_FREQUENCY_MINUTES: u32 = 60;

/// Settings loaded once per run and passed explicitly to the push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Integration master switch.
    #[serde(default)]
    pub enabled: bool,

    /// Toggle for the ERP → platform stock direction.
    #[serde(default)]
    pub update_erp_stock_levels_to_platform: bool,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub default_warehouse: Option<WarehouseId>,

    #[serde(default)]
    pub warehouse_mapping: Vec<WarehouseMapping>,

    #[serde(default = "default_frequency")]
    pub inventory_sync_frequency_minutes: u32,
}

fn default_frequency() -> u32 {
    DEFAULT_SYNC_FREQUENCY_MINUTES
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            update_erp_stock_levels_to_platform: false,
            default_warehouse: None,
            warehouse_mapping: Vec::new(),
            inventory_sync_frequency_minutes: DEFAULT_SYNC_FREQUENCY_MINUTES,
        }
    }
}

impl SyncSettings {
    /// Both the integration and this sync direction are switched on.
    pub fn inventory_push_enabled(&self) -> bool {
        self.enabled && self.update_erp_stock_levels_to_platform
    }

    pub fn location_map(&self) -> LocationMap {
        LocationMap::from_mappings(&self.warehouse_mapping)
    }
}
