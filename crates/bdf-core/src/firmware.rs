//! Firmware - store, dispatcher and interrupt combined
//!
//! All commands flow: `Session → Firmware::handle() → Dispatcher (mutate) →
//! Interrupt (inspect + correct) → Session`.
//!
//! `Firmware` is the single owner of the variable store. The session loop
//! holds `&mut Firmware` for the whole decode-dispatch-evaluate sequence, so
//! the interrupt's read-modify-write of the breaker never interleaves with
//! another writer.

use bdf_ipc::Command;

use crate::interrupt::{Interrupt, InterruptReport};
use crate::step::{DispatchState, Dispatcher, StepResult};
use crate::store::VariableStore;

/// Everything that happened for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handled {
    pub step: StepResult,
    /// `None` when the command terminated the firmware
    pub interrupt: Option<InterruptReport>,
}

/// The simulated controller.
#[derive(Debug)]
pub struct Firmware {
    store: VariableStore,
    dispatcher: Dispatcher,
    interrupt: Interrupt,
}

impl Firmware {
    /// Power on with factory defaults and the default rules.
    pub fn new() -> Self {
        Self::with_parts(VariableStore::default(), Interrupt::default())
    }

    pub fn with_parts(store: VariableStore, interrupt: Interrupt) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(),
            interrupt,
        }
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    pub fn is_terminated(&self) -> bool {
        self.state() == DispatchState::Terminated
    }

    /// Dispatch one command, then run the interrupt unless it terminated.
    pub fn handle(&mut self, command: &Command) -> Handled {
        let step = self.dispatcher.dispatch(&mut self.store, command);
        if !step.runs_interrupt() {
            return Handled {
                step,
                interrupt: None,
            };
        }

        let report = self.interrupt.evaluate(&self.store);
        self.store = report.store.clone();

        Handled {
            step,
            interrupt: Some(report),
        }
    }
}

impl Default for Firmware {
    fn default() -> Self {
        Self::new()
    }
}
