//! Embedded store server process launcher.
//!
//! The server binary is opaque: it takes a data directory and a port,
//! and either comes up listening on that port or exits. A launch
//! attempt succeeds when the spawned child survives the startup grace
//! window, or immediately when something is already listening on the
//! store port (attach instead of spawn, which makes start idempotent).

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};

use crate::config::StoreConfig;

/// Cap on captured stderr from a failed launch.
const MAX_STDERR_BYTES: u64 = 16 * 1024;

/// A single launch attempt failure.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store process exited during startup (exit code {code:?}): {stderr}")]
    EarlyExit { code: Option<i32>, stderr: String },
}

/// Outcome of a successful launch attempt.
#[derive(Debug)]
pub enum Launch {
    /// We spawned the server and own the child process.
    Spawned(Child),
    /// A server was already listening on the store port.
    Attached,
}

/// Seam for starting the embedded server, mockable in tests.
#[async_trait]
pub trait StoreLauncher: Send + Sync {
    async fn launch(&self) -> Result<Launch, LaunchError>;
}

/// Production launcher: spawn the configured server binary bound to the
/// data directory.
pub struct ProcessLauncher {
    config: StoreConfig,
}

impl ProcessLauncher {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreLauncher for ProcessLauncher {
    async fn launch(&self) -> Result<Launch, LaunchError> {
        // Idempotent start: attach to an already-running server.
        if TcpStream::connect(("127.0.0.1", self.config.port))
            .await
            .is_ok()
        {
            tracing::info!(port = self.config.port, "Store already listening, attaching");
            return Ok(Launch::Attached);
        }

        let mut cmd = Command::new(&self.config.program);
        cmd.arg("-D")
            .arg(&self.config.data_dir)
            .arg("-p")
            .arg(self.config.port.to_string())
            .arg("-k")
            .arg(&self.config.data_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // The child is killed if the manager is dropped without an
            // orderly shutdown.
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: self.config.program.display().to_string(),
            source,
        })?;

        // A child that dies inside the grace window fails this attempt.
        match tokio::time::timeout(self.config.startup_grace, child.wait()).await {
            Err(_elapsed) => {
                tracing::info!(
                    pid = child.id(),
                    port = self.config.port,
                    data_dir = %self.config.data_dir.display(),
                    "Store process started",
                );
                Ok(Launch::Spawned(child))
            }
            Ok(Ok(status)) => {
                let stderr = read_stderr(&mut child).await;
                Err(LaunchError::EarlyExit {
                    code: status.code(),
                    stderr,
                })
            }
            Ok(Err(source)) => Err(LaunchError::Spawn {
                program: self.config.program.display().to_string(),
                source,
            }),
        }
    }
}

/// Drain the child's stderr, capped at [`MAX_STDERR_BYTES`].
async fn read_stderr(child: &mut Child) -> String {
    let mut buf = Vec::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = (&mut stderr).take(MAX_STDERR_BYTES).read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).trim().to_string()
}
