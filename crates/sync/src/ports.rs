//! Collaborator contracts.
//!
//! ERP-side ports are synchronous and may block; the push never runs two
//! calls concurrently.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use ecomsync_core::{EcomItemName, InventoryItemId, ItemCode, LocationId, VariantId, WarehouseId};
use ecomsync_inventory::{InventoryRow, SyncLogEntry, SyncSettings};

use crate::error::{PlatformError, PortError};

/// Loads the integration settings document.
pub trait SettingsSource {
    fn load_settings(&self) -> Result<SyncSettings, PortError>;
}

/// Rate gate for the scheduled entry point.
pub trait RunGate {
    /// Returns `true` when a run is due, recording `now` as the last run.
    fn need_to_run(&self, interval_minutes: u32, now: DateTime<Utc>) -> Result<bool, PortError>;
}

/// Current ERP stock rows.
pub trait InventorySource {
    /// Rows for the given warehouses whose stock changed since the ecom item
    /// was last synced.
    fn inventory_levels(
        &self,
        warehouses: &[WarehouseId],
        integration: &str,
    ) -> Result<Vec<InventoryRow>, PortError>;
}

/// Item lookups used by the eligibility filter.
pub trait ItemCatalog {
    /// Map ecom items of `integration` to their ERP item codes. Unknown names
    /// are simply absent from the result.
    fn item_codes(
        &self,
        ecom_items: &[EcomItemName],
        integration: &str,
    ) -> Result<HashMap<EcomItemName, ItemCode>, PortError>;

    /// Subset of `item_codes` flagged for sync and not disabled.
    fn sync_enabled_items(&self, item_codes: &[ItemCode]) -> Result<HashSet<ItemCode>, PortError>;
}

/// Per-ecom-item "last synced" timestamp. Idempotent.
pub trait SyncStatusStore {
    fn update_inventory_sync_status(
        &self,
        ecom_item: &EcomItemName,
        synced_on: DateTime<Utc>,
    ) -> Result<(), PortError>;
}

/// Transactional boundary, committed once per row.
pub trait UnitOfWork {
    fn commit(&self) -> Result<(), PortError>;
}

/// Append-only audit sink.
pub trait SyncLog {
    fn record(&self, entry: SyncLogEntry) -> Result<(), PortError>;
}

/// Everything the push needs from the ERP.
pub trait ErpGateway:
    SettingsSource + RunGate + InventorySource + ItemCatalog + SyncStatusStore + UnitOfWork
{
}

impl<T> ErpGateway for T where
    T: SettingsSource + RunGate + InventorySource + ItemCatalog + SyncStatusStore + UnitOfWork
{
}

/// Platform-side variant, reduced to what the push uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVariant {
    pub id: VariantId,
    pub inventory_item_id: Option<InventoryItemId>,
}

/// Remote e-commerce platform.
pub trait InventoryPlatform {
    /// Fails with [`PlatformError::NotFound`] when the variant does not exist.
    fn find_variant(&self, id: &VariantId) -> Result<PlatformVariant, PlatformError>;

    /// Set the absolute available quantity of an inventory item at a location.
    fn set_inventory_level(
        &self,
        location_id: LocationId,
        inventory_item_id: InventoryItemId,
        available: i64,
    ) -> Result<(), PlatformError>;
}

impl<S: SettingsSource + ?Sized> SettingsSource for Arc<S> {
    fn load_settings(&self) -> Result<SyncSettings, PortError> {
        (**self).load_settings()
    }
}

impl<S: RunGate + ?Sized> RunGate for Arc<S> {
    fn need_to_run(&self, interval_minutes: u32, now: DateTime<Utc>) -> Result<bool, PortError> {
        (**self).need_to_run(interval_minutes, now)
    }
}

impl<S: InventorySource + ?Sized> InventorySource for Arc<S> {
    fn inventory_levels(
        &self,
        warehouses: &[WarehouseId],
        integration: &str,
    ) -> Result<Vec<InventoryRow>, PortError> {
        (**self).inventory_levels(warehouses, integration)
    }
}

impl<S: ItemCatalog + ?Sized> ItemCatalog for Arc<S> {
    fn item_codes(
        &self,
        ecom_items: &[EcomItemName],
        integration: &str,
    ) -> Result<HashMap<EcomItemName, ItemCode>, PortError> {
        (**self).item_codes(ecom_items, integration)
    }

    fn sync_enabled_items(&self, item_codes: &[ItemCode]) -> Result<HashSet<ItemCode>, PortError> {
        (**self).sync_enabled_items(item_codes)
    }
}

impl<S: SyncStatusStore + ?Sized> SyncStatusStore for Arc<S> {
    fn update_inventory_sync_status(
        &self,
        ecom_item: &EcomItemName,
        synced_on: DateTime<Utc>,
    ) -> Result<(), PortError> {
        (**self).update_inventory_sync_status(ecom_item, synced_on)
    }
}

impl<S: UnitOfWork + ?Sized> UnitOfWork for Arc<S> {
    fn commit(&self) -> Result<(), PortError> {
        (**self).commit()
    }
}

impl<S: SyncLog + ?Sized> SyncLog for Arc<S> {
    fn record(&self, entry: SyncLogEntry) -> Result<(), PortError> {
        (**self).record(entry)
    }
}

impl<S: InventoryPlatform + ?Sized> InventoryPlatform for Arc<S> {
    fn find_variant(&self, id: &VariantId) -> Result<PlatformVariant, PlatformError> {
        (**self).find_variant(id)
    }

    fn set_inventory_level(
        &self,
        location_id: LocationId,
        inventory_item_id: InventoryItemId,
        available: i64,
    ) -> Result<(), PlatformError> {
        (**self).set_inventory_level(location_id, inventory_item_id, available)
    }
}
