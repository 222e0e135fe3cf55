//! Session loop - one client connection, start to finish
//!
//! A session reads commands off one byte stream until the peer closes it or
//! sends EXIT. Each command is decoded, dispatched and followed by the
//! interrupt before the next byte is read; nothing else touches the firmware
//! while a session runs.

use std::io::{self, Write};

use bdf_core::{Effect, Firmware, ProtectiveAction};
use bdf_ipc::{Command, Decoded, Opcode, MAX_COMMAND_LEN};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{info, warn};

use crate::report::Reporter;

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// Peer closed the stream (or the stream failed)
    Closed,
    /// Peer sent EXIT; the server must shut down
    Terminated,
}

/// Read one command.
///
/// Zero bytes before the opcode is a clean close. After the opcode, argument
/// bytes are read until the arity is met or the stream ends; a short tail
/// decodes as [`Decoded::Truncated`].
pub async fn read_command<R>(reader: &mut R) -> io::Result<Decoded>
where
    R: AsyncRead + Unpin,
{
    let mut opcode = [0u8; 1];
    if reader.read(&mut opcode).await? == 0 {
        return Ok(Decoded::Closed);
    }

    let arity = Opcode::from_u8(opcode[0]).arity();
    let mut args = [0u8; MAX_COMMAND_LEN - 1];
    let mut received = 0;
    while received < arity {
        let n = reader.read(&mut args[received..arity]).await?;
        if n == 0 {
            break;
        }
        received += n;
    }

    Ok(Command::from_wire(opcode[0], &args[..received]))
}

/// Drive `firmware` with every command on `reader`.
pub async fn run_session<R, W>(
    firmware: &mut Firmware,
    reader: &mut R,
    reporter: &mut Reporter<W>,
) -> SessionEnd
where
    R: AsyncRead + Unpin,
    W: Write,
{
    loop {
        let command = match read_command(reader).await {
            Ok(Decoded::Closed) => return SessionEnd::Closed,
            Ok(Decoded::Complete(command)) => command,
            Ok(Decoded::Truncated { command, received }) => {
                warn!(
                    opcode = command.opcode().as_u8(),
                    received,
                    expected = command.opcode().arity(),
                    "truncated command, missing arguments read as 0"
                );
                command
            }
            Err(e) => {
                warn!(error = %e, "session read failed");
                return SessionEnd::Closed;
            }
        };

        let handled = firmware.handle(&command);
        match handled.step.effect {
            Effect::None => info!("command: nop"),
            Effect::VariableSet { address, old, new } => {
                info!(address = address.as_u8(), name = %address, old, new, "command: set variable")
            }
            Effect::Unknown { opcode } => warn!(opcode, "unknown command"),
            Effect::Terminate => info!("command: exit"),
        }

        let Some(report) = handled.interrupt else {
            return SessionEnd::Terminated;
        };

        for action in &report.actions {
            let ProtectiveAction::BreakerTripped {
                rule,
                breaker,
                value,
                low,
                high,
            } = action;
            warn!(rule, breaker = %breaker, value, low, high, "PROTECTED: breaker tripped");
        }

        if let Err(e) = reporter.interrupt(&report) {
            warn!(error = %e, "failed to write interrupt report");
        }
    }
}
