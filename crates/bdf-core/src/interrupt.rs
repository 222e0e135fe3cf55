//! Interrupt handler - protective rules evaluated after every command
//!
//! Real firmware does its work in interrupt handlers driven by hardware. Here
//! the interrupt runs synchronously after every command that leaves the
//! dispatcher running, and never after EXIT.
//!
//! # Rules
//!
//! Each rule guards one protected resource. The only resource today is the
//! circuit breaker:
//!
//! 1. **Voltage breaker**: if the breaker is closed (non-zero) and voltage is
//!    outside `[min_voltage, max_voltage]` inclusive, open the breaker (set 0).
//!
//! Rules are evaluated in order on a working copy of the store, so a later
//! rule sees what earlier rules did. Evaluation is pure: the caller decides
//! whether to commit the returned store.

use alloc::vec;
use alloc::vec::Vec;

use bdf_ipc::Address;
use serde::Serialize;

use crate::snapshot::Snapshot;
use crate::store::VariableStore;

/// Opens a breaker slot when a monitored slot leaves its bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakerRule {
    /// Rule name used in reports
    pub name: &'static str,
    /// Breaker slot: 0 = open, non-zero = closed
    pub breaker: Address,
    /// Slot whose value is checked
    pub monitored: Address,
    /// Slot holding the inclusive lower bound
    pub low: Address,
    /// Slot holding the inclusive upper bound
    pub high: Address,
}

/// The voltage circuit breaker.
pub const VOLTAGE_BREAKER: BreakerRule = BreakerRule {
    name: "voltage_breaker",
    breaker: Address::CircuitBreaker,
    monitored: Address::Voltage,
    low: Address::MinVoltage,
    high: Address::MaxVoltage,
};

impl BreakerRule {
    /// Check the rule against `store`, opening the breaker if it trips.
    ///
    /// An already-open breaker is left alone, so applying the rule twice is
    /// the same as applying it once.
    pub fn apply(&self, store: &mut VariableStore) -> Option<ProtectiveAction> {
        let breaker = store.get(self.breaker.as_u8());
        let value = store.get(self.monitored.as_u8());
        let low = store.get(self.low.as_u8());
        let high = store.get(self.high.as_u8());

        if breaker == 0 || (low..=high).contains(&value) {
            return None;
        }

        store.set(self.breaker.as_u8(), 0);
        Some(ProtectiveAction::BreakerTripped {
            rule: self.name,
            breaker: self.breaker,
            value,
            low,
            high,
        })
    }
}

/// Autonomous state change made by a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtectiveAction {
    /// A breaker was opened
    BreakerTripped {
        rule: &'static str,
        breaker: Address,
        /// Monitored value that was out of bounds
        value: u8,
        low: u8,
        high: u8,
    },
}

/// Outcome of one interrupt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterruptReport {
    /// Store after all rules ran
    pub store: VariableStore,
    /// Actions taken, in rule order
    pub actions: Vec<ProtectiveAction>,
    /// Diagnostic view of `store`
    pub snapshot: Snapshot,
}

impl InterruptReport {
    pub fn tripped(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Ordered set of protective rules.
#[derive(Clone, Debug)]
pub struct Interrupt {
    rules: Vec<BreakerRule>,
}

impl Interrupt {
    pub fn new(rules: Vec<BreakerRule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule against a copy of `store`.
    pub fn evaluate(&self, store: &VariableStore) -> InterruptReport {
        let mut next = store.clone();
        let actions = self
            .rules
            .iter()
            .filter_map(|rule| rule.apply(&mut next))
            .collect();
        let snapshot = Snapshot::capture(&next);

        InterruptReport {
            store: next,
            actions,
            snapshot,
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new(vec![VOLTAGE_BREAKER])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(voltage: u8, min: u8, max: u8, breaker: u8) -> VariableStore {
        let mut store = VariableStore::zeroed();
        store.set(Address::Voltage.as_u8(), voltage);
        store.set(Address::MinVoltage.as_u8(), min);
        store.set(Address::MaxVoltage.as_u8(), max);
        store.set(Address::CircuitBreaker.as_u8(), breaker);
        store
    }

    #[test]
    fn test_trips_below_min() {
        let store = store_with(200, 235, 245, 1);
        let report = Interrupt::default().evaluate(&store);

        assert!(report.tripped());
        assert_eq!(report.store.get(5), 0);
        assert_eq!(
            report.actions,
            [ProtectiveAction::BreakerTripped {
                rule: "voltage_breaker",
                breaker: Address::CircuitBreaker,
                value: 200,
                low: 235,
                high: 245,
            }]
        );
        assert_eq!(report.snapshot.value(5), Some(0));
        // Input is untouched
        assert_eq!(store.get(5), 1);
    }

    #[test]
    fn test_trips_above_max() {
        let report = Interrupt::default().evaluate(&store_with(246, 235, 245, 9));
        assert_eq!(report.store.get(5), 0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        for voltage in [235, 240, 245] {
            let report = Interrupt::default().evaluate(&store_with(voltage, 235, 245, 1));
            assert!(!report.tripped());
            assert_eq!(report.store.get(5), 1);
        }
    }

    #[test]
    fn test_open_breaker_stays_open_without_action() {
        let report = Interrupt::default().evaluate(&store_with(0, 235, 245, 0));
        assert!(!report.tripped());
        assert_eq!(report.store.get(5), 0);
    }

    #[test]
    fn test_inverted_bounds_always_trip() {
        let report = Interrupt::default().evaluate(&store_with(240, 245, 235, 1));
        assert!(report.tripped());
    }

    #[test]
    fn test_rules_see_earlier_rules() {
        // Second rule monitors the first rule's breaker.
        let chained = BreakerRule {
            name: "backup",
            breaker: Address::Var(10),
            monitored: Address::CircuitBreaker,
            low: Address::Var(11),
            high: Address::Var(12),
        };
        let mut store = store_with(200, 235, 245, 1);
        store.set(10, 1);
        store.set(11, 1);
        store.set(12, 1);

        let report = Interrupt::new(vec![VOLTAGE_BREAKER, chained]).evaluate(&store);
        assert_eq!(report.actions.len(), 2);
        assert_eq!(report.store.get(10), 0);
    }

    #[test]
    fn test_no_rules_is_identity() {
        let store = store_with(0, 235, 245, 1);
        let report = Interrupt::new(Vec::new()).evaluate(&store);
        assert_eq!(report.store, store);
    }
}
