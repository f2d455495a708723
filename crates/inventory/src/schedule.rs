//! Run-frequency rule for the scheduled entry point.

use chrono::{DateTime, Duration, Utc};

/// Whether a scheduled run is due.
///
/// Never-run jobs are always due; otherwise the interval (minutes) must have
/// fully elapsed since the last run.
pub fn is_due(last_run: Option<DateTime<Utc>>, interval_minutes: u32, now: DateTime<Utc>) -> bool {
    match last_run {
        None => true,
        Some(last) => now >= last + Duration::minutes(i64::from(interval_minutes)),
    }
}
