//! In-memory platform for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use ecomsync_core::{InventoryItemId, LocationId, VariantId};
use ecomsync_sync::{InventoryPlatform, PlatformError, PlatformVariant};

#[derive(Debug, Default)]
struct State {
    variants: HashMap<VariantId, Option<InventoryItemId>>,
    locations: HashSet<LocationId>,
    levels: HashMap<(LocationId, InventoryItemId), i64>,
    failing_items: HashMap<InventoryItemId, String>,
    set_calls: Vec<(LocationId, InventoryItemId, i64)>,
}

/// Platform double: known variants and locations, current levels, and a log
/// of every `set` call.
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    state: Mutex<State>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(self, location: LocationId) -> Self {
        if let Ok(mut s) = self.state.lock() {
            s.locations.insert(location);
        }
        self
    }

    pub fn with_variant(self, id: VariantId, inventory_item_id: Option<InventoryItemId>) -> Self {
        if let Ok(mut s) = self.state.lock() {
            s.variants.insert(id, inventory_item_id);
        }
        self
    }

    /// Make `set` fail for this inventory item with an API error.
    pub fn failing_item(self, item: InventoryItemId, message: impl Into<String>) -> Self {
        if let Ok(mut s) = self.state.lock() {
            s.failing_items.insert(item, message.into());
        }
        self
    }

    pub fn level(&self, location: LocationId, item: InventoryItemId) -> Option<i64> {
        self.state.lock().ok()?.levels.get(&(location, item)).copied()
    }

    pub fn set_calls(&self) -> Vec<(LocationId, InventoryItemId, i64)> {
        self.state
            .lock()
            .map(|s| s.set_calls.clone())
            .unwrap_or_default()
    }
}

fn poisoned() -> PlatformError {
    PlatformError::Transport("platform state lock poisoned".to_string())
}

impl InventoryPlatform for InMemoryPlatform {
    fn find_variant(&self, id: &VariantId) -> Result<PlatformVariant, PlatformError> {
        let s = self.state.lock().map_err(|_| poisoned())?;
        match s.variants.get(id) {
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
        let mut s = self.state.lock().map_err(|_| poisoned())?;
        s.set_calls.push((location_id, inventory_item_id, available));
        if !s.locations.contains(&location_id) {
            return Err(PlatformError::NotFound(format!("location {location_id}")));
        }
        if let Some(msg) = s.failing_items.get(&inventory_item_id) {
            return Err(PlatformError::Api {
                status: 422,
                body: msg.clone(),
            });
        }
        s.levels.insert((location_id, inventory_item_id), available);
        Ok(())
    }
}
