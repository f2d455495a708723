//! Restrict rows to items flagged for sync.

use ecomsync_core::{EcomItemName, ItemCode};
use ecomsync_inventory::InventoryRow;
use tracing::debug;

use crate::error::PortError;
use crate::ports::ItemCatalog;

/// Keep rows whose ERP item is sync-enabled and not disabled.
///
/// Each row's ecom item is resolved to an item code within `integration`;
/// rows that do not resolve are dropped, as are rows whose item is not
/// flagged. Order is preserved. Empty input returns without querying.
pub fn filter_to_flagged_items<C>(
    catalog: &C,
    integration: &str,
    rows: Vec<InventoryRow>,
) -> Result<Vec<InventoryRow>, PortError>
where
    C: ItemCatalog + ?Sized,
{
    if rows.is_empty() {
        return Ok(rows);
    }

    let mut names: Vec<EcomItemName> = rows.iter().map(|r| r.ecom_item.clone()).collect();
    names.sort();
    names.dedup();

    let ecom_to_item = catalog.item_codes(&names, integration)?;
    if ecom_to_item.is_empty() {
        debug!(rows = rows.len(), "no ecom items resolved to ERP items");
        return Ok(Vec::new());
    }

    let mut codes: Vec<ItemCode> = ecom_to_item.values().cloned().collect();
    codes.sort();
    codes.dedup();
    let allowed = catalog.sync_enabled_items(&codes)?;

    let before = rows.len();
    let kept: Vec<InventoryRow> = rows
        .into_iter()
        .filter(|r| {
            ecom_to_item
                .get(&r.ecom_item)
                .is_some_and(|code| allowed.contains(code))
        })
        .collect();

    debug!(kept = kept.len(), dropped = before - kept.len(), "filtered rows to flagged items");
    Ok(kept)
}
