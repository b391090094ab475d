//! The startup orchestrator.
//!
//! [`StoreManager`] sequences the startup of the embedded store and
//! owns the only shared mutable state involved: the connection state
//! (via [`StateCell`]) and the client pool / child process handles.
//! Steps are strictly sequential; each one's success gates the next.
//! Request handlers never assume the sequence finished -- they call
//! [`is_ready`](StoreManager::is_ready) /
//! [`pool`](StoreManager::pool) and fail fast with
//! [`StoreError::NotReady`] otherwise.

use std::sync::Arc;

use satchel_db::DbPool;
use tokio::process::Child;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::StoreConfig;
use crate::connect::{PgConnector, StoreConnector};
use crate::error::StoreError;
use crate::lifecycle::{ConnectionState, StateCell};
use crate::process::{Launch, ProcessLauncher, StoreLauncher};
use crate::retry::{run_with_retry, RetryOutcome};
use crate::storage;

/// Orchestrates storage preparation, server start, and client connect.
pub struct StoreManager {
    config: StoreConfig,
    state: StateCell,
    /// Fired by [`abort_startup`](Self::abort_startup); stops further
    /// retry attempts.
    cancel: CancellationToken,
    launcher: Box<dyn StoreLauncher>,
    connector: Box<dyn StoreConnector>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    pool: Option<DbPool>,
    /// Present only when we spawned the server ourselves (not when
    /// attached to an already-running one).
    child: Option<Child>,
}

impl StoreManager {
    /// Build a manager with the production launcher and connector.
    pub fn new(config: StoreConfig) -> Arc<Self> {
        let launcher = Box::new(ProcessLauncher::new(config.clone()));
        let connector = Box::new(PgConnector::new(&config));
        Self::with_components(config, launcher, connector)
    }

    /// Build a manager with explicit launcher/connector implementations.
    pub fn with_components(
        config: StoreConfig,
        launcher: Box<dyn StoreLauncher>,
        connector: Box<dyn StoreConnector>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            state: StateCell::new(),
            cancel: CancellationToken::new(),
            launcher,
            connector,
            inner: Mutex::new(Inner::default()),
        })
    }

    /// Wrap an already-connected pool whose store lifecycle is owned
    /// elsewhere. The manager starts in `Connected`; `startup` must not
    /// be called on it.
    pub fn attach_pool(config: StoreConfig, pool: DbPool) -> Arc<Self> {
        let launcher = Box::new(ProcessLauncher::new(config.clone()));
        let connector = Box::new(PgConnector::new(&config));
        let state = StateCell::new();
        state.transition(ConnectionState::Connected);
        Arc::new(Self {
            config,
            state,
            cancel: CancellationToken::new(),
            launcher,
            connector,
            inner: Mutex::new(Inner {
                pool: Some(pool),
                child: None,
            }),
        })
    }

    /// Run the full startup sequence: storage location, server process,
    /// client connection. Any error is fatal; the caller must not start
    /// serving requests after one.
    pub async fn startup(&self) -> Result<(), StoreError> {
        self.ensure_storage_location()?;
        self.start_embedded_store().await?;
        self.connect_client().await?;
        Ok(())
    }

    /// Prepare the data directory. Must complete before
    /// [`start_embedded_store`](Self::start_embedded_store).
    pub fn ensure_storage_location(&self) -> Result<(), StoreError> {
        storage::ensure_storage_location(&self.config.data_dir)
    }

    /// Start (or attach to) the embedded server process, retrying per
    /// `config.start_retry`. Exhaustion is fatal and moves the state to
    /// `Failed`.
    pub async fn start_embedded_store(&self) -> Result<(), StoreError> {
        self.state.transition(ConnectionState::Connecting);

        let outcome = run_with_retry(
            "start embedded store",
            &self.config.start_retry,
            &self.cancel,
            |_| self.launcher.launch(),
        )
        .await;

        match outcome {
            RetryOutcome::Ok(Launch::Spawned(child)) => {
                self.inner.lock().await.child = Some(child);
                Ok(())
            }
            RetryOutcome::Ok(Launch::Attached) => Ok(()),
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                self.state.transition(ConnectionState::Failed);
                Err(StoreError::StoreStartFailed {
                    attempts,
                    last_error,
                })
            }
            RetryOutcome::Cancelled => {
                self.state.transition(ConnectionState::Failed);
                Err(StoreError::StartupCancelled)
            }
        }
    }

    /// Connect the client pool, retrying per `config.connect_retry`
    /// (counters independent from the start step). Success moves the
    /// state to `Connected`, releasing every `await_ready` waiter.
    pub async fn connect_client(&self) -> Result<(), StoreError> {
        let outcome = run_with_retry(
            "connect store client",
            &self.config.connect_retry,
            &self.cancel,
            |_| self.connector.connect(),
        )
        .await;

        match outcome {
            RetryOutcome::Ok(pool) => {
                self.inner.lock().await.pool = Some(pool);
                self.state.transition(ConnectionState::Connected);
                tracing::info!(
                    database = %self.config.database,
                    port = self.config.port,
                    "Store client connected",
                );
                Ok(())
            }
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                self.state.transition(ConnectionState::Failed);
                Err(StoreError::ClientConnectFailed {
                    attempts,
                    last_error,
                })
            }
            RetryOutcome::Cancelled => {
                self.state.transition(ConnectionState::Failed);
                Err(StoreError::StartupCancelled)
            }
        }
    }

    /// Non-blocking readiness check for request handlers.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Current lifecycle state (for health reporting).
    pub fn state(&self) -> ConnectionState {
        self.state.current()
    }

    /// Suspend until the store is connected, or fail if startup failed.
    pub async fn await_ready(&self) -> Result<(), StoreError> {
        self.state.await_ready().await
    }

    /// The client pool, available only once `Connected`.
    ///
    /// Handlers call this instead of holding their own pool reference
    /// so that pre-readiness requests fail fast with `NotReady` rather
    /// than hanging.
    pub async fn pool(&self) -> Result<DbPool, StoreError> {
        if !self.state.is_ready() {
            return Err(StoreError::NotReady);
        }
        self.inner
            .lock()
            .await
            .pool
            .clone()
            .ok_or(StoreError::NotReady)
    }

    /// Request startup abortion: stops further retry attempts. The
    /// in-flight step returns [`StoreError::StartupCancelled`] and the
    /// state moves to `Failed`.
    pub fn abort_startup(&self) {
        tracing::info!("Aborting store startup");
        self.cancel.cancel();
    }

    /// Release the client connection and stop the server process if we
    /// spawned it. Idempotent: safe to call when already disconnected
    /// or never connected, and never errors in those cases.
    pub async fn shutdown(&self) {
        let (pool, child) = {
            let mut inner = self.inner.lock().await;
            (inner.pool.take(), inner.child.take())
        };

        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!("Store client connection closed");
        }

        if let Some(mut child) = child {
            match child.kill().await {
                Ok(()) => tracing::info!("Store process stopped"),
                Err(e) => tracing::warn!(error = %e, "Failed to stop store process"),
            }
        }

        self.state.transition(ConnectionState::Disconnected);
    }
}
