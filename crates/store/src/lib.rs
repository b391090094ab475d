//! Startup orchestration for the embedded record store.
//!
//! The store is an external server process bound to a local data
//! directory. [`StoreManager`] sequences the startup steps -- prepare
//! the storage location, start (or attach to) the server process with
//! bounded retries, connect the client pool with bounded retries -- and
//! exposes the readiness gate that request handlers consult before
//! touching the store.

pub mod config;
pub mod connect;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod process;
pub mod retry;
pub mod storage;

pub use config::StoreConfig;
pub use error::StoreError;
pub use lifecycle::ConnectionState;
pub use manager::StoreManager;
