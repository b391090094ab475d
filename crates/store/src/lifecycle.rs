//! Connection lifecycle state machine.
//!
//! `Disconnected -> Connecting -> Connected -> Disconnected` (on
//! shutdown), with `Failed` reachable from `Connecting` only once the
//! active attempt has exhausted its retries (or was cancelled).
//! `Failed` is terminal for that startup attempt: the orchestrator does
//! not auto-restart from it.
//!
//! The state lives in a [`tokio::sync::watch`] channel, so
//! [`StateCell::await_ready`] suspends without busy-polling and every
//! waiter is released by the same transition.

use std::fmt;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::StoreError;

/// Lifecycle state of the store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Explicit holder for the connection state.
///
/// Transitions are atomic with respect to concurrent readers, and
/// waiters blocked in [`await_ready`](StateCell::await_ready) observe
/// every transition.
pub struct StateCell {
    tx: watch::Sender<ConnectionState>,
}

impl StateCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ConnectionState::Disconnected);
        Self { tx }
    }

    /// Current state, read without blocking.
    pub fn current(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    /// True only in [`ConnectionState::Connected`].
    pub fn is_ready(&self) -> bool {
        self.current() == ConnectionState::Connected
    }

    /// Move to `next`, waking all waiters.
    pub fn transition(&self, next: ConnectionState) {
        let prev = self.tx.send_replace(next);
        if prev != next {
            tracing::debug!(%prev, %next, "Store connection state changed");
        }
    }

    /// Suspend until the state reaches `Connected`.
    ///
    /// Fails with [`StoreError::Connection`] if the state reaches
    /// `Failed` first. Safe to call from any number of concurrent
    /// tasks; all are released by the same transition.
    pub async fn await_ready(&self) -> Result<(), StoreError> {
        let mut rx = self.tx.subscribe();
        loop {
            match *rx.borrow_and_update() {
                ConnectionState::Connected => return Ok(()),
                ConnectionState::Failed => {
                    return Err(StoreError::Connection(
                        "store failed before becoming ready".into(),
                    ))
                }
                ConnectionState::Disconnected | ConnectionState::Connecting => {}
            }
            if rx.changed().await.is_err() {
                return Err(StoreError::Connection("state holder dropped".into()));
            }
        }
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
