//! Diagnostic view of the variable store
//!
//! Not part of the protocol. A snapshot lists every slot that is named or
//! holds a non-zero value.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use bdf_ipc::Address;
use serde::Serialize;

use crate::store::VariableStore;

/// One reported slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotEntry {
    pub address: u8,
    /// Alias, or `var[N]` for generic slots
    pub label: String,
    pub value: u8,
}

/// Named or non-zero slots, ascending by address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub entries: Vec<SlotEntry>,
}

impl Snapshot {
    pub fn capture(store: &VariableStore) -> Self {
        let entries = store
            .iter()
            .filter_map(|(addr, value)| {
                let address = Address::from_u8(addr);
                (address.name().is_some() || value != 0).then(|| SlotEntry {
                    address: addr,
                    label: address.to_string(),
                    value,
                })
            })
            .collect();
        Self { entries }
    }

    /// Value reported for `address`, if it is listed.
    pub fn value(&self, address: u8) -> Option<u8> {
        self.entries
            .iter()
            .find(|e| e.address == address)
            .map(|e| e.value)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "variables:")?;
        for entry in &self.entries {
            writeln!(f, "  {}: {:<24} = {}", entry.address, entry.label, entry.value)?;
        }
        Ok(())
    }
}
