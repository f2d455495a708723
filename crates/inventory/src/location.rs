//! Warehouse → platform location resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecomsync_core::{LocationId, WarehouseId};

/// One row of the settings' warehouse mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseMapping {
    pub erp_warehouse: WarehouseId,
    /// Platform location id as entered by the user; validated on use.
    pub location_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Default warehouse is not set on the integration settings (field: default_warehouse).")]
    DefaultWarehouseUnset,

    #[error("No platform location mapping for warehouse: {warehouse}")]
    Unmapped { warehouse: WarehouseId },

    #[error("Platform location id must be numeric. Got '{value}' for '{warehouse}'.")]
    NotNumeric { warehouse: WarehouseId, value: String },
}

/// ERP warehouse → platform location id (raw text until resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationMap {
    entries: BTreeMap<WarehouseId, String>,
}

impl LocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the mapping table. Later rows win on duplicate warehouses.
    pub fn from_mappings<'a>(rows: impl IntoIterator<Item = &'a WarehouseMapping>) -> Self {
        let entries = rows
            .into_iter()
            .map(|m| (m.erp_warehouse.clone(), m.location_id.clone()))
            .collect();
        Self { entries }
    }

    /// The single-entry map used by the push (default warehouse only).
    pub fn single(warehouse: WarehouseId, location_id: LocationId) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(warehouse, location_id.to_string());
        Self { entries }
    }

    pub fn insert(&mut self, warehouse: WarehouseId, location_id: impl Into<String>) {
        self.entries.insert(warehouse, location_id.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a warehouse to its numeric location id.
    pub fn resolve(&self, warehouse: &WarehouseId) -> Result<LocationId, LocationError> {
        let raw = self.entries.get(warehouse).ok_or_else(|| LocationError::Unmapped {
            warehouse: warehouse.clone(),
        })?;
        raw.parse::<LocationId>().map_err(|_| LocationError::NotNumeric {
            warehouse: warehouse.clone(),
            value: raw.clone(),
        })
    }
}

/// Resolve the default warehouse to the single location the push targets.
///
/// Hard precondition for a run: fails if the default warehouse is unset,
/// unmapped, or mapped to a non-integer value.
pub fn resolve_default_location(
    map: &LocationMap,
    default_warehouse: Option<&WarehouseId>,
) -> Result<LocationId, LocationError> {
    let warehouse = default_warehouse.ok_or(LocationError::DefaultWarehouseUnset)?;
    map.resolve(warehouse)
}
