//! Command values and their byte encoding.

use alloc::vec::Vec;

use crate::{Address, Opcode};

/// One command as it travels on the wire.
///
/// Commands are transient: they exist for one dispatch and are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the interrupt without touching any variable
    Nop,
    /// Stop the server; the interrupt does not run
    Exit,
    /// Overwrite one variable slot
    SetVariable { address: Address, value: u8 },
    /// Opcode with no assigned meaning, accepted as a zero-argument command
    Unknown { opcode: u8 },
}

impl Command {
    /// The command's opcode.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Command::Nop => Opcode::Nop,
            Command::Exit => Opcode::Exit,
            Command::SetVariable { .. } => Opcode::SetVariable,
            Command::Unknown { opcode } => Opcode::Unknown(*opcode),
        }
    }

    /// Byte-exact wire form: opcode followed by the fixed argument bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.opcode().arity());
        bytes.push(self.opcode().as_u8());
        if let Command::SetVariable { address, value } = self {
            bytes.push(address.as_u8());
            bytes.push(*value);
        }
        bytes
    }

    /// Build a command from an opcode byte and the argument bytes the stream
    /// actually delivered.
    ///
    /// `args` may be shorter than the opcode's arity when the peer closed the
    /// stream mid-command. Missing bytes read as 0, i.e. address `unused` and
    /// value 0, and the result is reported as [`Decoded::Truncated`]. Extra
    /// bytes beyond the arity are ignored.
    pub fn from_wire(opcode: u8, args: &[u8]) -> Decoded {
        let op = Opcode::from_u8(opcode);
        let arity = op.arity();
        let received = args.len().min(arity);
        let arg = |i: usize| args.get(i).copied().unwrap_or(0);

        let command = match op {
            Opcode::Nop => Command::Nop,
            Opcode::Exit => Command::Exit,
            Opcode::SetVariable => Command::SetVariable {
                address: Address::from_u8(arg(0)),
                value: arg(1),
            },
            Opcode::Unknown(raw) => Command::Unknown { opcode: raw },
        };

        if received < arity {
            Decoded::Truncated { command, received }
        } else {
            Decoded::Complete(command)
        }
    }
}

/// Result of reading one command from a byte stream.
///
/// Keeps "the client sent zeros" apart from "the client hung up early".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// Opcode and all of its argument bytes arrived
    Complete(Command),
    /// Stream ended after the opcode but before all arguments; missing bytes
    /// were defaulted to 0
    Truncated {
        command: Command,
        /// Argument bytes that did arrive
        received: usize,
    },
    /// Stream ended before the opcode byte
    Closed,
}

impl Decoded {
    /// The command to dispatch, if any.
    pub fn command(&self) -> Option<Command> {
        match self {
            Decoded::Complete(command) | Decoded::Truncated { command, .. } => Some(*command),
            Decoded::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_fixed_arity() {
        assert_eq!(Command::Nop.encode(), [0]);
        assert_eq!(Command::Exit.encode(), [1]);
        assert_eq!(
            Command::SetVariable { address: Address::Var(17), value: 99 }.encode(),
            [2, 17, 99]
        );
        assert_eq!(Command::Unknown { opcode: 200 }.encode(), [200]);
    }

    #[test]
    fn test_from_wire_complete() {
        assert_eq!(
            Command::from_wire(2, &[1, 200]),
            Decoded::Complete(Command::SetVariable { address: Address::Voltage, value: 200 })
        );
        assert_eq!(Command::from_wire(0, &[]), Decoded::Complete(Command::Nop));
    }

    #[test]
    fn test_truncated_set_defaults_to_unused_zero() {
        let decoded = Command::from_wire(2, &[]);
        assert_eq!(
            decoded,
            Decoded::Truncated {
                command: Command::SetVariable { address: Address::Unused, value: 0 },
                received: 0,
            }
        );
        // Same effect as an explicit SET_VARIABLE(0, 0), but distinguishable.
        assert_eq!(
            decoded.command(),
            Command::from_wire(2, &[0, 0]).command()
        );
        assert_ne!(decoded, Command::from_wire(2, &[0, 0]));
    }

    #[test]
    fn test_truncated_set_keeps_delivered_address() {
        assert_eq!(
            Command::from_wire(2, &[4]),
            Decoded::Truncated {
                command: Command::SetVariable { address: Address::MaxVoltage, value: 0 },
                received: 1,
            }
        );
    }

    #[test]
    fn test_unknown_opcode_is_zero_argument_command() {
        assert_eq!(
            Command::from_wire(200, &[]),
            Decoded::Complete(Command::Unknown { opcode: 200 })
        );
    }

    #[test]
    fn test_closed_has_no_command() {
        assert_eq!(Decoded::Closed.command(), None);
    }
}
