use ecomsync_inventory::{BatchSummary, RowReport};

use crate::error::PortError;
use crate::ports::SyncLog;

/// Summarise a finished batch and write one audit entry for it.
pub fn log_batch_status<L>(log: &L, reports: &[RowReport]) -> Result<BatchSummary, PortError>
where
    L: SyncLog + ?Sized,
{
    let summary = BatchSummary::from_reports(reports);
    log.record(summary.to_log_entry())?;
    Ok(summary)
}
