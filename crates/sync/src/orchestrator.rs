//! Scheduled and manual entry points.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use ecomsync_inventory::{
    resolve_default_location, LocationError, LocationMap, LogStatus, SyncLogEntry, SyncSettings,
};

use crate::eligibility::filter_to_flagged_items;
use crate::error::SyncError;
use crate::ports::{ErpGateway, InventoryPlatform, SyncLog};
use crate::pusher::{push_inventory, PushReport, BATCH_SIZE};

/// Integration name used to scope ecom item lookups.
pub const DEFAULT_INTEGRATION: &str = "shopify";

/// What a run did. The audit log carries the operator-facing record; this is
/// for callers (CLI, runner, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Scheduled run skipped by the run-frequency gate.
    NotDue,
    /// Integration or the inventory direction is switched off.
    Disabled,
    DefaultWarehouseMissing,
    LocationUnresolved(LocationError),
    NoRows,
    NothingFlagged,
    Pushed(PushReport),
}

/// The inventory push, wired to its collaborators.
#[derive(Debug)]
pub struct InventorySync<E, P, L> {
    erp: E,
    platform: P,
    log: L,
    integration: String,
    batch_size: usize,
}

impl<E, P, L> InventorySync<E, P, L>
where
    E: ErpGateway,
    P: InventoryPlatform,
    L: SyncLog,
{
    pub fn new(erp: E, platform: P, log: L) -> Self {
        Self {
            erp,
            platform,
            log,
            integration: DEFAULT_INTEGRATION.to_string(),
            batch_size: BATCH_SIZE,
        }
    }

    pub fn with_integration(mut self, integration: impl Into<String>) -> Self {
        self.integration = integration.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Scheduled entry point: gated by the run-frequency check.
    pub fn run_scheduled(&self) -> Result<RunOutcome, SyncError> {
        let result = self.load_settings().and_then(|settings| {
            let due = self
                .erp
                .need_to_run(settings.inventory_sync_frequency_minutes, Utc::now())
                .map_err(SyncError::RunGate)?;
            if !due {
                debug!("inventory push not due yet");
                return Ok(RunOutcome::NotDue);
            }
            self.run_with_settings(&settings)
        });
        self.finish(result)
    }

    /// Manual entry point: runs immediately, ungated.
    pub fn run_now(&self) -> Result<RunOutcome, SyncError> {
        let result = self
            .load_settings()
            .and_then(|settings| self.run_with_settings(&settings));
        self.finish(result)
    }

    fn load_settings(&self) -> Result<SyncSettings, SyncError> {
        self.erp.load_settings().map_err(SyncError::Settings)
    }

    fn run_with_settings(&self, settings: &SyncSettings) -> Result<RunOutcome, SyncError> {
        if !settings.inventory_push_enabled() {
            debug!("inventory push disabled in settings");
            return Ok(RunOutcome::Disabled);
        }

        let Some(default_wh) = settings.default_warehouse.as_ref() else {
            self.audit(LogStatus::Error, LocationError::DefaultWarehouseUnset.to_string())?;
            return Ok(RunOutcome::DefaultWarehouseMissing);
        };

        let location_id = match resolve_default_location(&settings.location_map(), Some(default_wh)) {
            Ok(id) => id,
            Err(e) => {
                warn!(warehouse = %default_wh, error = %e, "default warehouse location unresolved");
                self.audit(LogStatus::Error, e.to_string())?;
                return Ok(RunOutcome::LocationUnresolved(e));
            }
        };

        let rows = self
            .erp
            .inventory_levels(std::slice::from_ref(default_wh), &self.integration)
            .map_err(SyncError::Inventory)?;
        if rows.is_empty() {
            self.audit(
                LogStatus::Success,
                format!("No inventory rows found for default warehouse: {default_wh}"),
            )?;
            return Ok(RunOutcome::NoRows);
        }

        let rows = filter_to_flagged_items(&self.erp, &self.integration, rows)
            .map_err(SyncError::Catalog)?;
        if rows.is_empty() {
            self.audit(
                LogStatus::Success,
                "No flagged items to sync (sync enabled and not disabled).",
            )?;
            return Ok(RunOutcome::NothingFlagged);
        }

        info!(
            warehouse = %default_wh,
            location = %location_id,
            rows = rows.len(),
            "pushing inventory"
        );
        let locations = LocationMap::single(default_wh.clone(), location_id);
        let report = push_inventory(
            &self.erp,
            &self.platform,
            &self.log,
            &rows,
            &locations,
            Utc::now(),
            self.batch_size,
        )?;
        info!(
            batches = report.batches,
            rows = report.rows,
            succeeded = report.succeeded,
            "inventory push finished"
        );
        Ok(RunOutcome::Pushed(report))
    }

    fn audit(&self, status: LogStatus, message: impl Into<String>) -> Result<(), SyncError> {
        self.log
            .record(SyncLogEntry::new(status, message))
            .map_err(SyncError::AuditLog)
    }

    /// Run-level failures get an `Error` audit entry before being returned.
    fn finish(&self, result: Result<RunOutcome, SyncError>) -> Result<RunOutcome, SyncError> {
        if let Err(e) = &result {
            error!(error = %e, "inventory push aborted");
            if !matches!(e, SyncError::AuditLog(_)) {
                if let Err(log_err) = self.audit(LogStatus::Error, e.to_string()) {
                    warn!(error = %log_err, "failed to record aborted run");
                }
            }
        }
        result
    }
}
