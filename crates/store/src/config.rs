use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Embedded store configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. The server
/// program is treated as an opaque binary that accepts a data directory
/// and a port; the client connects over localhost.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store server binary (default: `postgres`).
    pub program: PathBuf,
    /// Data directory the server is bound to (default: `./store-data`).
    pub data_dir: PathBuf,
    /// Logical database name (default: `satchel`).
    pub database: String,
    /// Connection user (default: `satchel`).
    pub user: String,
    /// Localhost port the server listens on (default: `28015`).
    pub port: u16,
    /// Retry policy for starting the server process.
    pub start_retry: RetryPolicy,
    /// Retry policy for connecting the client pool. Counters are
    /// independent from `start_retry`.
    pub connect_retry: RetryPolicy,
    /// How long a freshly spawned server process must stay alive before
    /// the start attempt counts as successful (default: `500ms`).
    pub startup_grace: Duration,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default        |
    /// |-------------------------|----------------|
    /// | `STORE_PROGRAM`         | `postgres`     |
    /// | `STORE_DATA_DIR`        | `./store-data` |
    /// | `STORE_DATABASE`        | `satchel`      |
    /// | `STORE_USER`            | `satchel`      |
    /// | `STORE_PORT`            | `28015`        |
    /// | `STORE_START_RETRIES`   | `5`            |
    /// | `STORE_CONNECT_RETRIES` | `5`            |
    /// | `STORE_RETRY_DELAY_MS`  | `5000`         |
    /// | `STORE_STARTUP_GRACE_MS`| `500`          |
    pub fn from_env() -> Self {
        let program = PathBuf::from(env_or("STORE_PROGRAM", "postgres"));
        let data_dir = PathBuf::from(env_or("STORE_DATA_DIR", "./store-data"));
        let database = env_or("STORE_DATABASE", "satchel");
        let user = env_or("STORE_USER", "satchel");

        let port: u16 = env_or("STORE_PORT", "28015")
            .parse()
            .expect("STORE_PORT must be a valid u16");

        let start_retries: u32 = env_or("STORE_START_RETRIES", "5")
            .parse()
            .expect("STORE_START_RETRIES must be a valid u32");

        let connect_retries: u32 = env_or("STORE_CONNECT_RETRIES", "5")
            .parse()
            .expect("STORE_CONNECT_RETRIES must be a valid u32");

        let retry_delay_ms: u64 = env_or("STORE_RETRY_DELAY_MS", "5000")
            .parse()
            .expect("STORE_RETRY_DELAY_MS must be a valid u64");

        let startup_grace_ms: u64 = env_or("STORE_STARTUP_GRACE_MS", "500")
            .parse()
            .expect("STORE_STARTUP_GRACE_MS must be a valid u64");

        let delay = Duration::from_millis(retry_delay_ms);

        Self {
            program,
            data_dir,
            database,
            user,
            port,
            start_retry: RetryPolicy {
                max_attempts: start_retries,
                delay,
                ..RetryPolicy::default()
            },
            connect_retry: RetryPolicy {
                max_attempts: connect_retries,
                delay,
                ..RetryPolicy::default()
            },
            startup_grace: Duration::from_millis(startup_grace_ms),
        }
    }

    /// Connection URL for the client pool.
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}@127.0.0.1:{}/{}",
            self.user, self.port, self.database
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
