//! Backdoor Framework Firmware
//!
//! The runtime wrapper around `bdf-core`: a Unix-domain socket server that
//! plays the role of firmware, and the client that agents (or simulated
//! hardware interrupts) use to poke it.
//!
//! # Operation
//!
//! Agents and hardware interrupts are treated the same way: each is a client
//! that connects, sends zero or more commands and disconnects. The server
//! handles clients strictly in sequence and runs the interrupt after every
//! command. Being able to open the socket is the only authentication.
//!
//! ```text
//! client ──bytes──▶ Server ──▶ run_session ──▶ Firmware::handle ──▶ Reporter
//!                     ▲                              │
//!                     └────── next accept ◀──────────┘ (until EXIT)
//! ```
//!
//! # Modules
//!
//! - `config` - socket path and report format
//! - `session` - decode loop for one connection
//! - `server` - sequential accept loop
//! - `client` - command-line token encoder and sender
//! - `report` - interrupt reports (text or JSON)
//! - `error` - `FirmwareError`

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod server;
pub mod session;

pub use config::{FirmwareConfig, DEFAULT_SOCKET_PATH, SOCKET_ENV};
pub use error::{FirmwareError, Result};
pub use report::{ReportFormat, Reporter};
pub use server::Server;
pub use session::{read_command, run_session, SessionEnd};
