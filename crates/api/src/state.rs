use std::sync::Arc;

use satchel_store::StoreManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Startup orchestrator and readiness gate for the embedded store.
    /// Handlers obtain the pool through it, never directly.
    pub store: Arc<StoreManager>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
