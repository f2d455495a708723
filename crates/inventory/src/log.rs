//! Audit log entries (append-only, operator-facing).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use ecomsync_core::LogEntryId;

/// Method name recorded on every entry written by the inventory push.
pub const INVENTORY_SYNC_METHOD: &str = "update_inventory_on_shopify";

/// Status of an audit entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogStatus {
    Success,
    #[serde(rename = "Partial Success")]
    PartialSuccess,
    Failed,
    Error,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "Success",
            LogStatus::PartialSuccess => "Partial Success",
            LogStatus::Failed => "Failed",
            LogStatus::Error => "Error",
        }
    }
}

impl core::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: LogEntryId,
    pub status: LogStatus,
    pub message: String,
    pub request_data: JsonValue,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl SyncLogEntry {
    pub fn new(status: LogStatus, message: impl Into<String>) -> Self {
        Self {
            id: LogEntryId::new(),
            status,
            message: message.into(),
            request_data: JsonValue::Object(Default::default()),
            method: INVENTORY_SYNC_METHOD.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_request_data(mut self, data: JsonValue) -> Self {
        self.request_data = data;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }
}
