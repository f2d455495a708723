use serde::{Deserialize, Serialize};

use ecomsync_core::{EcomItemName, LocationId, VariantId, WarehouseId};

/// One (ERP item, warehouse) stock fact to push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub ecom_item: EcomItemName,
    pub warehouse: WarehouseId,
    pub actual_qty: f64,
    pub reserved_qty: f64,
    /// Platform variant, when the item has been mapped.
    pub variant_id: Option<VariantId>,
}

/// Outcome of pushing a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason")]
pub enum RowOutcome {
    Success,
    Failed(String),
    /// No remote counterpart (variant or location); treated as processed.
    #[serde(rename = "Not Found")]
    NotFound(String),
}

impl RowOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    pub fn status(&self) -> RowStatus {
        match self {
            RowOutcome::Success => RowStatus::Success,
            RowOutcome::Failed(_) => RowStatus::Failed,
            RowOutcome::NotFound(_) => RowStatus::NotFound,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            RowOutcome::Success => None,
            RowOutcome::Failed(r) | RowOutcome::NotFound(r) => Some(r),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Success)
    }
}

/// Status label of a row outcome, as shown in the audit log.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowStatus {
    Success,
    Failed,
    #[serde(rename = "Not Found")]
    NotFound,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Success => "Success",
            RowStatus::Failed => "Failed",
            RowStatus::NotFound => "Not Found",
        }
    }
}

impl core::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one row during a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReport {
    pub ecom_item: EcomItemName,
    pub variant_id: Option<VariantId>,
    /// Set once the row's warehouse resolved to a location.
    pub location_id: Option<LocationId>,
    pub outcome: RowOutcome,
}

impl RowReport {
    pub fn new(row: &InventoryRow, location_id: Option<LocationId>, outcome: RowOutcome) -> Self {
        Self {
            ecom_item: row.ecom_item.clone(),
            variant_id: row.variant_id.clone(),
            location_id,
            outcome,
        }
    }

    pub fn status(&self) -> RowStatus {
        self.outcome.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_exposes_status_and_reason() {
        let nf = RowOutcome::not_found("variant gone");
        assert_eq!(nf.status(), RowStatus::NotFound);
        assert_eq!(nf.failure_reason(), Some("variant gone"));
        assert_eq!(RowOutcome::Success.failure_reason(), None);
        assert_eq!(RowStatus::NotFound.to_string(), "Not Found");
    }

    #[test]
    fn outcome_serializes_with_log_labels() {
        let json = serde_json::to_value(RowOutcome::not_found("x")).unwrap();
        assert_eq!(json["status"], "Not Found");
        assert_eq!(json["reason"], "x");
    }
}
