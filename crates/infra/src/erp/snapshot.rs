use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecomsync_core::id::blank_as_none;
use ecomsync_core::{EcomItemName, ItemCode, VariantId, WarehouseId};
use ecomsync_inventory::SyncSettings;

/// Serialized form of the ERP documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErpSnapshot {
    #[serde(default)]
    pub settings: SyncSettings,

    /// Last time the scheduled push was let through the run gate.
    #[serde(default)]
    pub last_inventory_sync: Option<DateTime<Utc>>,

    #[serde(default)]
    pub items: Vec<ErpItem>,

    #[serde(default)]
    pub ecommerce_items: Vec<EcommerceItem>,

    #[serde(default)]
    pub bins: Vec<StockBin>,
}

/// ERP `Item` document, reduced to the sync flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpItem {
    pub item_code: ItemCode,
    #[serde(default)]
    pub sync_to_platform: bool,
    #[serde(default)]
    pub disabled: bool,
}

/// Integration-specific mapping of an ERP item to a platform variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcommerceItem {
    pub name: EcomItemName,
    pub integration: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub erp_item_code: Option<ItemCode>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub inventory_synced_on: Option<DateTime<Utc>>,
}

/// Stock of one item in one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBin {
    pub item_code: ItemCode,
    pub warehouse: WarehouseId,
    #[serde(default)]
    pub actual_qty: f64,
    #[serde(default)]
    pub reserved_qty: f64,
    pub modified: DateTime<Utc>,
}

impl EcommerceItem {
    /// Whether `bin` changed after this item was last pushed.
    pub fn is_stale(&self, bin: &StockBin) -> bool {
        self.inventory_synced_on.is_none_or(|synced| bin.modified > synced)
    }
}
