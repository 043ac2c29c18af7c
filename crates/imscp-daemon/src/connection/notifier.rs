//! Daemon notifier.

use std::io;

use tokio::net::TcpStream;
use tracing::{debug, info};

use super::DaemonSession;
use super::stream::with_timeout;
use crate::config::DaemonConfig;
use crate::error::{Error, Result};

/// Notifies the i-MSCP daemon that changes are pending.
///
/// Every call opens its own connection, runs one [`DaemonSession`] and closes
/// it again. Nothing is shared between calls and nothing is retried: a
/// failed notification leaves the pending rows for the daemon's own cycle.
#[derive(Debug, Clone, Default)]
pub struct DaemonNotifier {
    config: DaemonConfig,
}

impl DaemonNotifier {
    /// Creates a notifier for the given configuration.
    #[must_use]
    pub const fn new(config: DaemonConfig) -> Self {
        Self { config }
    }

    /// Connects to the daemon and asks it to apply pending changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if the daemon is unreachable,
    /// [`Error::Protocol`] if it answers `999`, and [`Error::Io`] if the
    /// session breaks off or times out.
    pub async fn notify(&self) -> Result<()> {
        let stream = self.connect().await?;

        let reply = DaemonSession::new(stream)
            .client_name(self.config.client_name.as_str())
            .io_timeout(self.config.io_timeout)
            .run()
            .await?;

        info!(addr = %self.config.addr(), code = %reply.code, "Daemon accepted pending changes");
        Ok(())
    }

    /// Blocking version of [`notify`](Self::notify).
    ///
    /// Drives the session on a private current-thread runtime.
    ///
    /// # Errors
    ///
    /// Same as [`notify`](Self::notify), plus [`Error::Runtime`] if called
    /// from within a tokio runtime or if the runtime cannot be created.
    pub fn notify_blocking(&self) -> Result<()> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::Runtime(io::Error::other(
                "notify_blocking called from within an async runtime",
            )));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        runtime.block_on(self.notify())
    }

    async fn connect(&self) -> Result<TcpStream> {
        let addr = self.config.addr();
        debug!(%addr, "Connecting to daemon");

        let connect = TcpStream::connect((self.config.host.as_str(), self.config.port));
        with_timeout(self.config.connect_timeout, connect)
            .await
            .map_err(|source| Error::Connect { addr, source })
    }
}
