//! Command dispatch - the pure `Dispatcher::dispatch(store, command)` transition
//!
//! # State Machine
//!
//! ```text
//!            NOP / SET_VARIABLE / unknown
//!              ┌─────────┐
//!              ▼         │
//!         ┌─────────┐────┘      EXIT       ┌────────────┐
//!         │ Running │──────────────────────▶│ Terminated │ (absorbing)
//!         └─────────┘                       └────────────┘
//! ```
//!
//! Dispatch never fails. Every opcode, including unassigned ones, maps to a
//! defined transition.

use bdf_ipc::{Address, Command};

use crate::store::VariableStore;

/// Dispatcher state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchState {
    #[default]
    Running,
    Terminated,
}

/// What a dispatch did to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed (NOP, or any command after termination)
    None,
    /// A slot was overwritten
    VariableSet { address: Address, old: u8, new: u8 },
    /// Opcode has no meaning; nothing changed
    Unknown { opcode: u8 },
    /// The server must release its endpoint and stop
    Terminate,
}

/// Result of one dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepResult {
    /// State after the command
    pub state: DispatchState,
    /// Effect applied
    pub effect: Effect,
}

impl StepResult {
    /// Whether the interrupt should run after this step.
    pub fn runs_interrupt(&self) -> bool {
        self.state == DispatchState::Running
    }
}

/// Two-state command dispatcher.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    state: DispatchState,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Apply one command to `store`.
    pub fn dispatch(&mut self, store: &mut VariableStore, command: &Command) -> StepResult {
        if self.state == DispatchState::Terminated {
            return StepResult {
                state: DispatchState::Terminated,
                effect: Effect::None,
            };
        }

        let effect = match *command {
            Command::Nop => Effect::None,
            Command::Exit => {
                self.state = DispatchState::Terminated;
                Effect::Terminate
            }
            Command::SetVariable { address, value } => {
                let old = store.set(address.as_u8(), value);
                Effect::VariableSet {
                    address,
                    old,
                    new: value,
                }
            }
            Command::Unknown { opcode } => Effect::Unknown { opcode },
        };

        StepResult {
            state: self.state,
            effect,
        }
    }
}
