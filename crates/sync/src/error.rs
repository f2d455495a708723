use thiserror::Error;

/// Failure of an ERP-side collaborator (document store, audit sink).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl PortError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Failure of a remote platform call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The addressed remote resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The platform answered with a non-success status.
    #[error("platform returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode platform response: {0}")]
    Decode(String),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound(_))
    }
}

/// Run-level failure: anything outside the per-row boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("failed to load settings: {0}")]
    Settings(PortError),

    #[error("run-frequency check failed: {0}")]
    RunGate(PortError),

    #[error("failed to fetch inventory rows: {0}")]
    Inventory(PortError),

    #[error("failed to resolve sync-enabled items: {0}")]
    Catalog(PortError),

    #[error("failed to commit row outcome: {0}")]
    Commit(PortError),

    #[error("failed to write audit log: {0}")]
    AuditLog(PortError),
}
