//! In-process doubles for the collaborator ports.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use ecomsync_core::{EcomItemName, InventoryItemId, ItemCode, LocationId, VariantId, WarehouseId};
use ecomsync_inventory::{InventoryRow, SyncLogEntry, SyncSettings};

use crate::error::{PlatformError, PortError};
use crate::ports::{
    InventoryPlatform, InventorySource, ItemCatalog, PlatformVariant, RunGate, SettingsSource,
    SyncLog, SyncStatusStore, UnitOfWork,
};

pub const INTEGRATION: &str = "shopify";

pub fn wh(s: &str) -> WarehouseId {
    WarehouseId::new(s).unwrap()
}

pub fn ecom(s: &str) -> EcomItemName {
    EcomItemName::new(s).unwrap()
}

pub fn item(s: &str) -> ItemCode {
    ItemCode::new(s).unwrap()
}

pub fn variant(s: &str) -> VariantId {
    VariantId::new(s).unwrap()
}

pub fn row(ecom_item: &str, warehouse: &str, actual: f64, reserved: f64, v: Option<&str>) -> InventoryRow {
    InventoryRow {
        ecom_item: ecom(ecom_item),
        warehouse: wh(warehouse),
        actual_qty: actual,
        reserved_qty: reserved,
        variant_id: v.map(variant),
    }
}

#[derive(Debug, Default)]
pub struct FakeErp {
    pub settings: RefCell<SyncSettings>,
    pub due: Cell<bool>,
    pub gate_calls: Cell<u32>,
    pub rows: RefCell<Vec<InventoryRow>>,
    pub inventory_calls: RefCell<Vec<Vec<WarehouseId>>>,
    ecom_to_item: RefCell<HashMap<EcomItemName, ItemCode>>,
    enabled: RefCell<HashSet<ItemCode>>,
    pub catalog_calls: Cell<u32>,
    pub synced: RefCell<Vec<(EcomItemName, DateTime<Utc>)>>,
    pub fail_status_updates: Cell<bool>,
    pub commits: Cell<u32>,
}

impl FakeErp {
    pub fn map_item(&self, ecom_item: &str, code: &str) {
        self.ecom_to_item.borrow_mut().insert(ecom(ecom_item), item(code));
    }

    pub fn enable_item(&self, code: &str) {
        self.enabled.borrow_mut().insert(item(code));
    }

    pub fn item_for(&self, name: &EcomItemName) -> Option<ItemCode> {
        self.ecom_to_item.borrow().get(name).cloned()
    }

    pub fn is_enabled(&self, code: &ItemCode) -> bool {
        self.enabled.borrow().contains(code)
    }

    pub fn synced_items(&self) -> Vec<EcomItemName> {
        self.synced.borrow().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl SettingsSource for FakeErp {
    fn load_settings(&self) -> Result<SyncSettings, PortError> {
        Ok(self.settings.borrow().clone())
    }
}

impl RunGate for FakeErp {
    fn need_to_run(&self, _interval_minutes: u32, _now: DateTime<Utc>) -> Result<bool, PortError> {
        self.gate_calls.set(self.gate_calls.get() + 1);
        Ok(self.due.get())
    }
}

impl InventorySource for FakeErp {
    fn inventory_levels(
        &self,
        warehouses: &[WarehouseId],
        _integration: &str,
    ) -> Result<Vec<InventoryRow>, PortError> {
        self.inventory_calls.borrow_mut().push(warehouses.to_vec());
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|r| warehouses.contains(&r.warehouse))
            .cloned()
            .collect())
    }
}

impl ItemCatalog for FakeErp {
    fn item_codes(
        &self,
        ecom_items: &[EcomItemName],
        integration: &str,
    ) -> Result<HashMap<EcomItemName, ItemCode>, PortError> {
        self.catalog_calls.set(self.catalog_calls.get() + 1);
        if integration != INTEGRATION {
            return Ok(HashMap::new());
        }
        let map = self.ecom_to_item.borrow();
        Ok(ecom_items
            .iter()
            .filter_map(|n| map.get(n).map(|c| (n.clone(), c.clone())))
            .collect())
    }

    fn sync_enabled_items(&self, item_codes: &[ItemCode]) -> Result<HashSet<ItemCode>, PortError> {
        self.catalog_calls.set(self.catalog_calls.get() + 1);
        let enabled = self.enabled.borrow();
        Ok(item_codes.iter().filter(|c| enabled.contains(*c)).cloned().collect())
    }
}

impl SyncStatusStore for FakeErp {
    fn update_inventory_sync_status(
        &self,
        ecom_item: &EcomItemName,
        synced_on: DateTime<Utc>,
    ) -> Result<(), PortError> {
        if self.fail_status_updates.get() {
            return Err(PortError::storage("status table locked"));
        }
        self.synced.borrow_mut().push((ecom_item.clone(), synced_on));
        Ok(())
    }
}

impl UnitOfWork for FakeErp {
    fn commit(&self) -> Result<(), PortError> {
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Find(VariantId),
    Set {
        location_id: LocationId,
        inventory_item_id: InventoryItemId,
        available: i64,
    },
}

#[derive(Debug, Default)]
pub struct FakePlatform {
    variants: RefCell<HashMap<VariantId, Option<InventoryItemId>>>,
    pub find_errors: RefCell<HashMap<VariantId, PlatformError>>,
    pub set_errors: RefCell<HashMap<InventoryItemId, PlatformError>>,
    pub calls: RefCell<Vec<PlatformCall>>,
}

impl FakePlatform {
    pub fn add_variant(&self, id: &str, inventory_item_id: Option<i64>) {
        self.variants
            .borrow_mut()
            .insert(variant(id), inventory_item_id.map(InventoryItemId::new));
    }

    pub fn set_calls(&self) -> Vec<PlatformCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, PlatformCall::Set { .. }))
            .cloned()
            .collect()
    }
}

impl InventoryPlatform for FakePlatform {
    fn find_variant(&self, id: &VariantId) -> Result<PlatformVariant, PlatformError> {
        self.calls.borrow_mut().push(PlatformCall::Find(id.clone()));
        if let Some(e) = self.find_errors.borrow().get(id) {
            return Err(e.clone());
        }
        match self.variants.borrow().get(id) {
            Some(inventory_item_id) => Ok(PlatformVariant {
                id: id.clone(),
                inventory_item_id: *inventory_item_id,
            }),
            None => Err(PlatformError::NotFound(format!("variant {id}"))),
        }
    }

    fn set_inventory_level(
        &self,
        location_id: LocationId,
        inventory_item_id: InventoryItemId,
        available: i64,
    ) -> Result<(), PlatformError> {
        self.calls.borrow_mut().push(PlatformCall::Set {
            location_id,
            inventory_item_id,
            available,
        });
        match self.set_errors.borrow().get(&inventory_item_id) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeLog {
    entries: RefCell<Vec<SyncLogEntry>>,
    pub fail: Cell<bool>,
}

impl FakeLog {
    pub fn entries(&self) -> Vec<SyncLogEntry> {
        self.entries.borrow().clone()
    }
}

impl SyncLog for FakeLog {
    fn record(&self, entry: SyncLogEntry) -> Result<(), PortError> {
        if self.fail.get() {
            return Err(PortError::storage("log table unavailable"));
        }
        self.entries.borrow_mut().push(entry);
        Ok(())
    }
}
