//! Variable store - the firmware's only mutable state
//!
//! A flat array of 256 byte slots. The store has no policy and no knowledge
//! of names: every address is valid, every write succeeds, and no history is
//! kept. Callers serialize access; the store itself has no locking.

use bdf_ipc::Address;

/// Number of addressable slots (one per `u8` address).
pub const SLOT_COUNT: usize = 256;

/// Values at power-on, indexed by address. Unlisted slots start at 0.
pub const FACTORY_DEFAULTS: [(Address, u8); 6] = [
    (Address::Unused, 0),
    (Address::Voltage, 240),
    (Address::Amperage, 0),
    (Address::MinVoltage, 235),
    (Address::MaxVoltage, 245),
    (Address::CircuitBreaker, 1),
];

/// Fixed-size array of addressable byte slots.
#[derive(Clone, PartialEq, Eq)]
pub struct VariableStore {
    slots: [u8; SLOT_COUNT],
}

impl VariableStore {
    /// All slots zero.
    pub const fn zeroed() -> Self {
        Self {
            slots: [0; SLOT_COUNT],
        }
    }

    /// The power-on state.
    pub fn with_factory_defaults() -> Self {
        let mut store = Self::zeroed();
        for (address, value) in FACTORY_DEFAULTS {
            store.set(address.as_u8(), value);
        }
        store
    }

    /// Current value at `address`.
    #[inline]
    pub fn get(&self, address: u8) -> u8 {
        self.slots[address as usize]
    }

    /// Overwrite the value at `address`.
    ///
    /// Returns the value that was replaced so callers can log the change;
    /// the store does not remember it.
    #[inline]
    pub fn set(&mut self, address: u8, value: u8) -> u8 {
        core::mem::replace(&mut self.slots[address as usize], value)
    }

    /// All slots in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(addr, &value)| (addr as u8, value))
    }

    /// Slots holding a non-zero value, in address order.
    pub fn non_zero(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.iter().filter(|&(_, value)| value != 0)
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::with_factory_defaults()
    }
}

impl core::fmt::Debug for VariableStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.non_zero()).finish()
    }
}
