//! Batch pusher: one row at a time, committed before the next starts.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use ecomsync_inventory::{
    available_quantity, BatchSummary, InventoryRow, LocationMap, RowOutcome, RowReport,
};

use crate::batch_log::log_batch_status;
use crate::error::{PortError, SyncError};
use crate::ports::{InventoryPlatform, SyncLog, SyncStatusStore, UnitOfWork};

/// Rows per audit batch.
pub const BATCH_SIZE: usize = 50;

/// Totals across all batches of one push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub batches: usize,
    pub rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub not_found: usize,
}

impl PushReport {
    fn absorb(&mut self, summary: &BatchSummary) {
        self.batches += 1;
        self.rows += summary.total;
        self.succeeded += summary.succeeded;
        self.failed += summary.failed;
        self.not_found += summary.not_found;
    }
}

/// Push `rows` to the platform in batches of `batch_size`, preserving order.
///
/// Row-level failures never escape a row: they become a [`RowOutcome`].
/// Commit and audit-log failures abort the push.
pub fn push_inventory<S, P, L>(
    store: &S,
    platform: &P,
    log: &L,
    rows: &[InventoryRow],
    locations: &LocationMap,
    synced_on: DateTime<Utc>,
    batch_size: usize,
) -> Result<PushReport, SyncError>
where
    S: SyncStatusStore + UnitOfWork + ?Sized,
    P: InventoryPlatform + ?Sized,
    L: SyncLog + ?Sized,
{
    let mut report = PushReport::default();

    for (n, batch) in rows.chunks(batch_size.max(1)).enumerate() {
        let mut reports = Vec::with_capacity(batch.len());
        for row in batch {
            let r = within_unit_of_work(store, || {
                push_row(store, platform, row, locations, synced_on)
            })
            .map_err(SyncError::Commit)?;
            reports.push(r);
        }

        let summary = log_batch_status(log, &reports).map_err(SyncError::AuditLog)?;
        info!(
            batch = n + 1,
            rows = summary.total,
            succeeded = summary.succeeded,
            status = %summary.status,
            "inventory batch pushed"
        );
        report.absorb(&summary);
    }

    Ok(report)
}

/// Run one row's work, then commit it.
fn within_unit_of_work<U, T>(uow: &U, work: impl FnOnce() -> T) -> Result<T, PortError>
where
    U: UnitOfWork + ?Sized,
{
    let out = work();
    uow.commit()?;
    Ok(out)
}

fn push_row<S, P>(
    store: &S,
    platform: &P,
    row: &InventoryRow,
    locations: &LocationMap,
    synced_on: DateTime<Utc>,
) -> RowReport
where
    S: SyncStatusStore + ?Sized,
    P: InventoryPlatform + ?Sized,
{
    let location_id = match locations.resolve(&row.warehouse) {
        Ok(id) => id,
        Err(e) => {
            debug!(warehouse = %row.warehouse, error = %e, "row warehouse has no usable location");
            mark_synced_best_effort(store, row, synced_on);
            return RowReport::new(
                row,
                None,
                RowOutcome::failed(format!(
                    "No numeric platform location for ERP warehouse: {}",
                    row.warehouse
                )),
            );
        }
    };
    let report = |outcome| RowReport::new(row, Some(location_id), outcome);

    let Some(variant_id) = row.variant_id.as_ref() else {
        mark_synced_best_effort(store, row, synced_on);
        return report(RowOutcome::failed(format!(
            "missing variant mapping for ecom item {}",
            row.ecom_item
        )));
    };

    let not_found = || {
        RowOutcome::not_found(format!(
            "Variant or Location not found. variant_id={variant_id} loc={location_id}"
        ))
    };

    let variant = match platform.find_variant(variant_id) {
        Ok(v) => v,
        Err(e) if e.is_not_found() => {
            mark_synced_best_effort(store, row, synced_on);
            return report(not_found());
        }
        Err(e) => return report(RowOutcome::failed(e.to_string())),
    };

    let Some(inventory_item_id) = variant.inventory_item_id else {
        mark_synced_best_effort(store, row, synced_on);
        return report(RowOutcome::failed(format!(
            "Platform variant {variant_id} has no inventory_item_id."
        )));
    };

    let available = available_quantity(row.actual_qty, row.reserved_qty);
    match platform.set_inventory_level(location_id, inventory_item_id, available) {
        Ok(()) => match store.update_inventory_sync_status(&row.ecom_item, synced_on) {
            Ok(()) => report(RowOutcome::Success),
            Err(e) => report(RowOutcome::failed(e.to_string())),
        },
        Err(e) if e.is_not_found() => {
            mark_synced_best_effort(store, row, synced_on);
            report(not_found())
        }
        Err(e) => report(RowOutcome::failed(e.to_string())),
    }
}

/// Record the row as processed; failures here must not affect the row.
fn mark_synced_best_effort<S>(store: &S, row: &InventoryRow, synced_on: DateTime<Utc>)
where
    S: SyncStatusStore + ?Sized,
{
    if let Err(e) = store.update_inventory_sync_status(&row.ecom_item, synced_on) {
        warn!(ecom_item = %row.ecom_item, error = %e, "failed to record inventory sync status");
    }
}
