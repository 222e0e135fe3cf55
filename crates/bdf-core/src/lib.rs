//! Backdoor Framework Core - Pure Firmware State Machine
//!
//! This crate contains the **pure, I/O-free** part of the simulated
//! controller: the variable store, the command dispatcher and the interrupt
//! rules that run after every command.
//!
//! # Design Principles
//!
//! 1. **No I/O**: sockets, printing and logging live in `bdf-firmware`
//! 2. **Total**: every command, including malformed ones, has a defined effect
//! 3. **Deterministic**: same store and command always give the same result
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        bdf-core                             │
//! │                                                             │
//! │   ┌───────────────┐    ┌───────────────┐    ┌───────────┐   │
//! │   │ VariableStore │───▶│  Dispatcher   │───▶│ Interrupt │   │
//! │   │  256 slots    │    │ Running/Term. │    │  rules    │   │
//! │   └───────────────┘    └───────────────┘    └───────────┘   │
//! │                              ▲                    │         │
//! │                              └──── Firmware ◀─────┘         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ used by
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      bdf-firmware                           │
//! │   - Unix socket server, one session at a time               │
//! │   - Diagnostic reports, tracing                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - `store` - `VariableStore` and the factory defaults
//! - `step` - `Dispatcher`: `dispatch(store, command) -> StepResult`
//! - `interrupt` - protective rules and `InterruptReport`
//! - `snapshot` - diagnostic view of the store
//! - `firmware` - `Firmware`, the single owner of the store

#![no_std]
extern crate alloc;

pub mod firmware;
pub mod interrupt;
pub mod snapshot;
pub mod step;
pub mod store;

pub use firmware::{Firmware, Handled};
pub use interrupt::{BreakerRule, Interrupt, InterruptReport, ProtectiveAction, VOLTAGE_BREAKER};
pub use snapshot::{SlotEntry, Snapshot};
pub use step::{DispatchState, Dispatcher, Effect, StepResult};
pub use store::{VariableStore, FACTORY_DEFAULTS, SLOT_COUNT};
