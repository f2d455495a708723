//! Per-batch audit summary.

use crate::log::{LogStatus, SyncLogEntry};
use crate::row::{RowReport, RowStatus};

const TABLE_HEADER: &str = "variant_id,location_id,status,failure_reason";

/// Aggregated outcome of one batch of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub not_found: usize,
    /// Share of successful rows, in percent.
    pub percentage: f64,
    pub status: LogStatus,
    /// One CSV line per row, with header.
    pub table: String,
}

impl BatchSummary {
    pub fn from_reports(reports: &[RowReport]) -> Self {
        let mut succeeded = 0;
        let mut failed = 0;
        let mut not_found = 0;
        for r in reports {
            match r.status() {
                RowStatus::Success => succeeded += 1,
                RowStatus::Failed => failed += 1,
                RowStatus::NotFound => not_found += 1,
            }
        }

        let total = reports.len();
        let fraction = succeeded as f64 / total.max(1) as f64;
        let status = if total > 0 && succeeded == total {
            LogStatus::Success
        } else if succeeded > 0 {
            LogStatus::PartialSuccess
        } else {
            LogStatus::Failed
        };

        let mut table = String::from(TABLE_HEADER);
        for r in reports {
            table.push('\n');
            table.push_str(&table_line(r));
        }

        Self {
            total,
            succeeded,
            failed,
            not_found,
            percentage: fraction * 100.0,
            status,
            table,
        }
    }

    /// Operator-facing text. The percentage is rounded to one decimal here;
    /// `percentage` keeps full precision.
    pub fn message(&self) -> String {
        format!("Updated {:.1}% items\n\n{}", self.percentage, self.table)
    }

    pub fn to_log_entry(&self) -> SyncLogEntry {
        SyncLogEntry::new(self.status, self.message())
    }
}

fn table_line(r: &RowReport) -> String {
    format!(
        "{},{},{},{}",
        r.variant_id.as_ref().map(|v| v.as_str()).unwrap_or(""),
        r.location_id.map(|l| l.to_string()).unwrap_or_default(),
        r.status(),
        r.outcome.failure_reason().unwrap_or(""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowOutcome;
    use ecomsync_core::{EcomItemName, LocationId, VariantId};
    use proptest::prelude::*;

    fn report(variant: &str, outcome: RowOutcome) -> RowReport {
        RowReport {
            ecom_item: EcomItemName::new(format!("ecom-{variant}")).unwrap(),
            variant_id: Some(VariantId::new(variant).unwrap()),
            location_id: Some(LocationId::new(5)),
            outcome,
        }
    }

    fn with_statuses(statuses: &[RowStatus]) -> Vec<RowReport> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let outcome = match s {
                    RowStatus::Success => RowOutcome::Success,
                    RowStatus::Failed => RowOutcome::failed("boom"),
                    RowStatus::NotFound => RowOutcome::not_found("gone"),
                };
                report(&format!("{}", 100 + i), outcome)
            })
            .collect()
    }

    #[test]
    fn three_of_four_is_partial_success_at_75_percent() {
        use RowStatus::*;
        let s = BatchSummary::from_reports(&with_statuses(&[Success, Success, Failed, Success]));
        assert_eq!(s.status, LogStatus::PartialSuccess);
        assert_eq!(s.percentage, 75.0);
        assert!(s.message().starts_with("Updated 75.0% items\n\n"));
        assert_eq!((s.succeeded, s.failed, s.not_found), (3, 1, 0));
    }

    #[test]
    fn message_rounds_percentage_to_one_decimal() {
        use RowStatus::*;
        let s = BatchSummary::from_reports(&with_statuses(&[Success, Success, Failed]));
        assert!((s.percentage - 200.0 / 3.0).abs() < 1e-9);
        assert!(s.message().starts_with("Updated 66.7% items\n\n"));
    }

    #[test]
    fn all_success_and_none_success() {
        use RowStatus::*;
        let ok = BatchSummary::from_reports(&with_statuses(&[Success, Success]));
        assert_eq!(ok.status, LogStatus::Success);
        assert_eq!(ok.percentage, 100.0);

        let bad = BatchSummary::from_reports(&with_statuses(&[Failed, NotFound]));
        assert_eq!(bad.status, LogStatus::Failed);
        assert_eq!(bad.percentage, 0.0);
    }

    #[test]
    fn empty_batch_does_not_divide_by_zero() {
        let s = BatchSummary::from_reports(&[]);
        assert_eq!(s.status, LogStatus::Failed);
        assert_eq!(s.percentage, 0.0);
        assert_eq!(s.table, TABLE_HEADER);
    }

    #[test]
    fn table_has_one_line_per_row() {
        let reports = vec![
            report("11", RowOutcome::Success),
            RowReport {
                ecom_item: EcomItemName::new("ecom-x").unwrap(),
                variant_id: None,
                location_id: None,
                outcome: RowOutcome::failed("missing variant mapping"),
            },
        ];
        let s = BatchSummary::from_reports(&reports);
        let lines: Vec<&str> = s.table.lines().collect();
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1], "11,5,Success,");
        assert_eq!(lines[2], ",,Failed,missing variant mapping");
    }

    fn status_strategy() -> impl Strategy<Value = RowStatus> {
        prop_oneof![
            Just(RowStatus::Success),
            Just(RowStatus::Failed),
            Just(RowStatus::NotFound),
        ]
    }

    proptest! {
        /// Property: classification follows the success fraction exactly.
        #[test]
        fn status_matches_success_fraction(
            statuses in prop::collection::vec(status_strategy(), 1..60)
        ) {
            let s = BatchSummary::from_reports(&with_statuses(&statuses));
            prop_assert_eq!(s.total, statuses.len());
            prop_assert_eq!(s.succeeded + s.failed + s.not_found, s.total);
            let expected = if s.succeeded == s.total {
                LogStatus::Success
            } else if s.succeeded == 0 {
                LogStatus::Failed
            } else {
                LogStatus::PartialSuccess
            };
            prop_assert_eq!(s.status, expected);
            prop_assert_eq!(s.table.lines().count(), s.total + 1);
        }
    }
}
