//! Unix-domain socket server
//!
//! Connections are accepted and served strictly one at a time: a session runs
//! to completion before the next `accept`. Any client that can open the socket
//! is trusted.

use std::io::Write;
use std::path::PathBuf;

use bdf_core::Firmware;
use tokio::net::UnixListener;
use tracing::{debug, info, warn};

use crate::config::FirmwareConfig;
use crate::error::{FirmwareError, Result};
use crate::report::Reporter;
use crate::session::{run_session, SessionEnd};

pub struct Server {
    listener: UnixListener,
    path: PathBuf,
    sessions: u64,
}

impl Server {
    /// Bind the control socket. Must be called inside a tokio runtime.
    pub fn bind(config: &FirmwareConfig) -> Result<Self> {
        let path = config.socket_path.clone();
        let listener = UnixListener::bind(&path).map_err(|source| FirmwareError::Bind {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "server is listening");
        Ok(Self {
            listener,
            path,
            sessions: 0,
        })
    }

    /// Serve sessions until one of them sends EXIT.
    ///
    /// On EXIT the socket file is removed before returning.
    pub async fn run<W: Write>(
        mut self,
        firmware: &mut Firmware,
        reporter: &mut Reporter<W>,
    ) -> Result<()> {
        loop {
            let (mut stream, _) = self.listener.accept().await.map_err(FirmwareError::Accept)?;
            self.sessions += 1;
            let session = self.sessions;
            debug!(session, "session opened");

            let end = run_session(firmware, &mut stream, reporter).await;
            debug!(session, ?end, "session closed");

            if end == SessionEnd::Terminated {
                drop(stream);
                self.shutdown();
                return Ok(());
            }
        }
    }

    fn shutdown(self) {
        drop(self.listener);
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove socket");
        }
        info!(sessions = self.sessions, "server stopped");
    }
}
