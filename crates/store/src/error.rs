use std::path::PathBuf;

/// Errors surfaced by the startup orchestrator.
///
/// `StorageUnavailable`, `StoreStartFailed`, `ClientConnectFailed`, and
/// `StartupCancelled` are fatal to startup: the owning process must not
/// proceed to accept requests after seeing one. `NotReady` is returned
/// to callers that attempt store operations before readiness and is
/// retryable by the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage location unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Embedded store failed to start after {attempts} attempts: {last_error}")]
    StoreStartFailed { attempts: u32, last_error: String },

    #[error("Store client failed to connect after {attempts} attempts: {last_error}")]
    ClientConnectFailed { attempts: u32, last_error: String },

    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store is not ready")]
    NotReady,

    #[error("Store startup was cancelled")]
    StartupCancelled,
}
