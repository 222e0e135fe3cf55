//! Resolved runtime configuration

use std::path::PathBuf;

use crate::report::ReportFormat;

/// Control socket used when none is configured, relative to the working
/// directory.
pub const DEFAULT_SOCKET_PATH: &str = "./backdoor-framework-socket";

/// Environment variable overriding the socket path.
pub const SOCKET_ENV: &str = "BDF_SOCKET";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirmwareConfig {
    /// Unix socket shared by server and clients
    pub socket_path: PathBuf,
    /// Rendering of interrupt reports on stdout
    pub report_format: ReportFormat,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            report_format: ReportFormat::default(),
        }
    }
}
