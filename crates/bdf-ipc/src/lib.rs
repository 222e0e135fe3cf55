//! Wire Protocol Constants & Codec for the Backdoor Framework
//!
//! This crate is the **single source of truth** for every number that
//! travels over the firmware's control socket:
//!
//! - **Opcodes** - the first byte of every command
//! - **Variable addresses** - slot numbers in the firmware's variable store
//!
//! # Wire Format
//!
//! | Byte | Meaning |
//! |------|---------|
//! | 0    | opcode |
//! | 1..  | fixed per-opcode arguments (SET_VARIABLE: address, value) |
//!
//! There is no length prefix and no response. A command is exactly
//! `1 + arity` bytes; see [`Command::from_wire`] for how short reads decode.
//!
//! # Compatibility
//!
//! Opcode and address numbers are used from shell scripts that drive the
//! client with bare integers. Once assigned, a number is never reassigned.
//!
//! # Usage
//!
//! ```rust
//! use bdf_ipc::{Address, Command};
//!
//! let cmd = Command::SetVariable { address: Address::Voltage, value: 100 };
//! assert_eq!(cmd.encode(), [2, 1, 100]);
//! ```

#![no_std]
extern crate alloc;

mod command;

pub use command::{Command, Decoded};

use core::fmt;
use serde::Serialize;

/// Longest command on the wire (opcode + two argument bytes).
pub const MAX_COMMAND_LEN: usize = 3;

// =============================================================================
// Raw Numbers
// =============================================================================

/// Opcode numbers. Never reassign.
pub mod opcode {
    /// No operation, but still runs the interrupt
    pub const OP_NOP: u8 = 0;
    /// Stop the server without running the interrupt
    pub const OP_EXIT: u8 = 1;
    /// Write a value into a variable slot
    pub const OP_SET_VARIABLE: u8 = 2;
}

/// Variable addresses. Never reassign.
pub mod var {
    /// Default slot when the client didn't specify anything
    pub const VAR_UNUSED: u8 = 0;
    /// Potential read from hardware
    pub const VAR_VOLTAGE: u8 = 1;
    /// Current read from hardware
    pub const VAR_AMPERAGE: u8 = 2;
    /// Minimum voltage before the breaker trips
    pub const VAR_MIN_VOLTAGE: u8 = 3;
    /// Maximum voltage before the breaker trips
    pub const VAR_MAX_VOLTAGE: u8 = 4;
    /// Breaker state: 0 = open, non-zero = closed
    pub const VAR_CIRCUIT_BREAKER: u8 = 5;
}

// =============================================================================
// Opcode
// =============================================================================

/// Decoded opcode byte.
///
/// Every byte maps to a variant; bytes without an assigned meaning are kept
/// as [`Opcode::Unknown`] so the raw value survives for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Nop,
    Exit,
    SetVariable,
    Unknown(u8),
}

impl Opcode {
    /// Convert from the wire byte. Total: never fails.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            opcode::OP_NOP => Opcode::Nop,
            opcode::OP_EXIT => Opcode::Exit,
            opcode::OP_SET_VARIABLE => Opcode::SetVariable,
            other => Opcode::Unknown(other),
        }
    }

    /// The wire byte.
    pub const fn as_u8(self) -> u8 {
        match self {
            Opcode::Nop => opcode::OP_NOP,
            Opcode::Exit => opcode::OP_EXIT,
            Opcode::SetVariable => opcode::OP_SET_VARIABLE,
            Opcode::Unknown(raw) => raw,
        }
    }

    /// Number of argument bytes that follow the opcode.
    ///
    /// Unknown opcodes take no arguments.
    pub const fn arity(self) -> usize {
        match self {
            Opcode::SetVariable => 2,
            Opcode::Nop | Opcode::Exit | Opcode::Unknown(_) => 0,
        }
    }

    /// Resolve a command-line name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nop" => Some(Opcode::Nop),
            "exit" => Some(Opcode::Exit),
            "set" => Some(Opcode::SetVariable),
            _ => None,
        }
    }
}

// =============================================================================
// Address
// =============================================================================

/// A variable slot address.
///
/// The store itself only knows numbers; names are for humans and for the
/// interrupt rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Address {
    Unused,
    Voltage,
    Amperage,
    MinVoltage,
    MaxVoltage,
    CircuitBreaker,
    /// Any slot without an alias
    Var(u8),
}

impl Address {
    /// Every named address, in address order.
    pub const NAMED: [Address; 6] = [
        Address::Unused,
        Address::Voltage,
        Address::Amperage,
        Address::MinVoltage,
        Address::MaxVoltage,
        Address::CircuitBreaker,
    ];

    /// Convert from the wire byte. Named numbers never produce `Var`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            var::VAR_UNUSED => Address::Unused,
            var::VAR_VOLTAGE => Address::Voltage,
            var::VAR_AMPERAGE => Address::Amperage,
            var::VAR_MIN_VOLTAGE => Address::MinVoltage,
            var::VAR_MAX_VOLTAGE => Address::MaxVoltage,
            var::VAR_CIRCUIT_BREAKER => Address::CircuitBreaker,
            other => Address::Var(other),
        }
    }

    /// The wire byte.
    pub const fn as_u8(self) -> u8 {
        match self {
            Address::Unused => var::VAR_UNUSED,
            Address::Voltage => var::VAR_VOLTAGE,
            Address::Amperage => var::VAR_AMPERAGE,
            Address::MinVoltage => var::VAR_MIN_VOLTAGE,
            Address::MaxVoltage => var::VAR_MAX_VOLTAGE,
            Address::CircuitBreaker => var::VAR_CIRCUIT_BREAKER,
            Address::Var(raw) => raw,
        }
    }

    /// Alias for a named slot, `None` for generic slots.
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Address::Unused => Some("unused"),
            Address::Voltage => Some("voltage"),
            Address::Amperage => Some("amperage"),
            Address::MinVoltage => Some("min_voltage"),
            Address::MaxVoltage => Some("max_voltage"),
            Address::CircuitBreaker => Some("circuit_breaker"),
            Address::Var(_) => None,
        }
    }

    /// Resolve an alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Address::NAMED
            .iter()
            .copied()
            .find(|addr| addr.name() == Some(name))
    }
}

impl From<u8> for Address {
    fn from(value: u8) -> Self {
        Address::from_u8(value)
    }
}

impl From<Address> for u8 {
    fn from(value: Address) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.pad(name),
            None => f.pad(&alloc::format!("var[{}]", self.as_u8())),
        }
    }
}
