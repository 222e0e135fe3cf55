//! Firmware process errors
//!
//! Only the transport and the client's command-line encoding can fail. The
//! command pipeline itself has no error paths.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FirmwareError>;

#[derive(Debug, Error)]
pub enum FirmwareError {
    #[error("cannot bind socket {}: {source}", path.display())]
    Bind { path: PathBuf, source: io::Error },

    #[error("cannot accept connections: {0}")]
    Accept(#[source] io::Error),

    #[error("cannot connect to server at {}: {source}", path.display())]
    Connect { path: PathBuf, source: io::Error },

    #[error("write to server failed: {0}")]
    Send(#[source] io::Error),

    #[error("usage: COMMAND [ARG...] where COMMAND and ARG are integers in [0,255] or names")]
    MissingCommand,

    #[error("too many arguments: a command is at most {max} tokens, got {got}")]
    TooManyArguments { max: usize, got: usize },

    #[error("invalid token {token:?}: {reason}")]
    InvalidToken { token: String, reason: &'static str },
}
