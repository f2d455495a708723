use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use ecomsync_core::{EcomItemName, ItemCode, WarehouseId};
use ecomsync_inventory::{is_due, InventoryRow, SyncSettings};
use ecomsync_sync::{
    InventorySource, ItemCatalog, PortError, RunGate, SettingsSource, SyncStatusStore, UnitOfWork,
};

use super::snapshot::ErpSnapshot;

#[derive(Debug, Error)]
pub enum ErpStoreError {
    #[error("failed to read ERP store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse ERP store {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// ERP documents held in memory, optionally backed by a JSON file.
///
/// Writes are visible immediately to readers of this store; [`UnitOfWork::commit`]
/// makes them durable by rewriting the backing file (when there is one).
#[derive(Debug)]
pub struct ErpStore {
    state: RwLock<ErpSnapshot>,
    path: Option<PathBuf>,
    commits: AtomicU64,
}

impl ErpStore {
    /// Store without a backing file (tests/dev).
    pub fn in_memory(snapshot: ErpSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
            path: None,
            commits: AtomicU64::new(0),
        }
    }

    /// Load a store from its JSON file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ErpStoreError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| ErpStoreError::Read {
            path: path.clone(),
            source,
        })?;
        let snapshot: ErpSnapshot =
            serde_json::from_str(&raw).map_err(|source| ErpStoreError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            state: RwLock::new(snapshot),
            path: Some(path),
            commits: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current documents.
    pub fn snapshot(&self) -> Result<ErpSnapshot, PortError> {
        Ok(self.read()?.clone())
    }

    /// Number of commits since the store was opened.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ErpSnapshot>, PortError> {
        self.state
            .read()
            .map_err(|_| PortError::storage("ERP store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ErpSnapshot>, PortError> {
        self.state
            .write()
            .map_err(|_| PortError::storage("ERP store lock poisoned"))
    }

    fn persist(&self, snapshot: &ErpSnapshot) -> Result<(), PortError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| PortError::storage(format!("serialize ERP store: {e}")))?;

        // Write-then-rename so a crash never leaves a truncated store.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| PortError::storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| PortError::storage(format!("replace {}: {e}", path.display())))?;
        Ok(())
    }
}

impl SettingsSource for ErpStore {
    fn load_settings(&self) -> Result<SyncSettings, PortError> {
        Ok(self.read()?.settings.clone())
    }
}

impl RunGate for ErpStore {
    fn need_to_run(&self, interval_minutes: u32, now: DateTime<Utc>) -> Result<bool, PortError> {
        let mut state = self.write()?;
        if !is_due(state.last_inventory_sync, interval_minutes, now) {
            return Ok(false);
        }
        state.last_inventory_sync = Some(now);
        self.persist(&state)?;
        Ok(true)
    }
}

impl InventorySource for ErpStore {
    fn inventory_levels(
        &self,
        warehouses: &[WarehouseId],
        integration: &str,
    ) -> Result<Vec<InventoryRow>, PortError> {
        let state = self.read()?;
        let mut rows = Vec::new();

        for ei in state.ecommerce_items.iter().filter(|ei| ei.integration == integration) {
            let Some(code) = ei.erp_item_code.as_ref() else {
                continue;
            };
            for bin in state
                .bins
                .iter()
                .filter(|b| &b.item_code == code && warehouses.contains(&b.warehouse))
                .filter(|b| ei.is_stale(b))
            {
                rows.push(InventoryRow {
                    ecom_item: ei.name.clone(),
                    warehouse: bin.warehouse.clone(),
                    actual_qty: bin.actual_qty,
                    reserved_qty: bin.reserved_qty,
                    variant_id: ei.variant_id.clone(),
                });
            }
        }

        debug!(rows = rows.len(), "fetched inventory rows");
        Ok(rows)
    }
}

impl ItemCatalog for ErpStore {
    fn item_codes(
        &self,
        ecom_items: &[EcomItemName],
        integration: &str,
    ) -> Result<HashMap<EcomItemName, ItemCode>, PortError> {
        let state = self.read()?;
        Ok(state
            .ecommerce_items
            .iter()
            .filter(|ei| ei.integration == integration && ecom_items.contains(&ei.name))
            .filter_map(|ei| ei.erp_item_code.clone().map(|code| (ei.name.clone(), code)))
            .collect())
    }

    fn sync_enabled_items(&self, item_codes: &[ItemCode]) -> Result<HashSet<ItemCode>, PortError> {
        let state = self.read()?;
        Ok(state
            .items
            .iter()
            .filter(|i| i.sync_to_platform && !i.disabled && item_codes.contains(&i.item_code))
            .map(|i| i.item_code.clone())
            .collect())
    }
}

impl SyncStatusStore for ErpStore {
    fn update_inventory_sync_status(
        &self,
        ecom_item: &EcomItemName,
        synced_on: DateTime<Utc>,
    ) -> Result<(), PortError> {
        let mut state = self.write()?;
        let ei = state
            .ecommerce_items
            .iter_mut()
            .find(|ei| &ei.name == ecom_item)
            .ok_or_else(|| PortError::not_found(format!("ecommerce item {ecom_item}")))?;
        ei.inventory_synced_on = Some(synced_on);
        Ok(())
    }
}

impl UnitOfWork for ErpStore {
    fn commit(&self) -> Result<(), PortError> {
        let state = self.read()?;
        self.persist(&state)?;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
