//! Control client - turns command-line tokens into wire bytes
//!
//! The first token names the command (`nop`, `exit`, `set`) or gives its
//! opcode number. For `set`, the next token is a variable name or address and
//! the last is the value. Numbers may be decimal, `0x` hex or `0`-prefixed
//! octal.
//!
//! Tokens are sent as given: `set voltage` sends two bytes and the server
//! decodes the missing value as 0.

use std::path::Path;

use bdf_ipc::{Address, Opcode, MAX_COMMAND_LEN};
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tracing::debug;

use crate::error::{FirmwareError, Result};

/// Parse a byte using the `strtoul(s, NULL, 0)` radix prefixes, rejecting
/// anything that does not fit in `[0, 255]`.
///
/// After the prefix every character must be a digit of the radix: signs are
/// rejected and a bare `0x` has no digits, so it is rejected too.
pub fn parse_byte(token: &str) -> Result<u8> {
    let invalid = |reason| FirmwareError::InvalidToken {
        token: token.to_string(),
        reason,
    };

    let (digits, radix) = if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        (hex, 16)
    } else if token.len() > 1 && token.starts_with('0') {
        (&token[1..], 8)
    } else {
        (token, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid("not a number"));
    }
    let value = u32::from_str_radix(digits, radix).map_err(|_| invalid("out of range [0,255]"))?;
    u8::try_from(value).map_err(|_| invalid("out of range [0,255]"))
}

/// Encode command-line tokens into the bytes of one command.
pub fn encode_args<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u8>> {
    let Some((first, args)) = tokens.split_first() else {
        return Err(FirmwareError::MissingCommand);
    };
    if tokens.len() > MAX_COMMAND_LEN {
        return Err(FirmwareError::TooManyArguments {
            max: MAX_COMMAND_LEN,
            got: tokens.len(),
        });
    }

    let first = first.as_ref();
    let opcode = match Opcode::from_name(first) {
        Some(op) => op,
        None => Opcode::from_u8(parse_byte(first)?),
    };

    let mut bytes = Vec::with_capacity(tokens.len());
    bytes.push(opcode.as_u8());
    for (i, arg) in args.iter().enumerate() {
        let arg = arg.as_ref();
        let byte = match (opcode, i) {
            (Opcode::SetVariable, 0) => match Address::from_name(arg) {
                Some(address) => address.as_u8(),
                None => parse_byte(arg)?,
            },
            _ => parse_byte(arg)?,
        };
        bytes.push(byte);
    }
    Ok(bytes)
}

/// Send `bytes` to the server on `path` as one session.
pub async fn send(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut stream = UnixStream::connect(path)
        .await
        .map_err(|source| FirmwareError::Connect {
            path: path.to_path_buf(),
            source,
        })?;

    stream.write_all(bytes).await.map_err(FirmwareError::Send)?;
    stream.shutdown().await.map_err(FirmwareError::Send)?;
    debug!(len = bytes.len(), "command sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte_radixes() {
        assert_eq!(parse_byte("0").unwrap(), 0);
        assert_eq!(parse_byte("200").unwrap(), 200);
        assert_eq!(parse_byte("0xff").unwrap(), 255);
        assert_eq!(parse_byte("0X1A").unwrap(), 26);
        assert_eq!(parse_byte("010").unwrap(), 8);
    }

    #[test]
    fn test_parse_byte_rejects() {
        assert!(matches!(
            parse_byte("256"),
            Err(FirmwareError::InvalidToken { reason: "out of range [0,255]", .. })
        ));
        assert!(parse_byte("volts").is_err());
        assert!(parse_byte("-1").is_err());
        assert!(parse_byte("09").is_err());
        assert!(parse_byte("").is_err());

        // Signs and empty digit runs are never numbers, in any radix.
        for token in ["+5", "0x+f", "0x", "0X", "-0", "0x-1", "0+7"] {
            assert!(
                matches!(
                    parse_byte(token),
                    Err(FirmwareError::InvalidToken { reason: "not a number", .. })
                ),
                "{token} should be rejected"
            );
        }
        // Overflowing u32 is still just out of range.
        assert!(matches!(
            parse_byte("99999999999"),
            Err(FirmwareError::InvalidToken { reason: "out of range [0,255]", .. })
        ));
    }

    #[test]
    fn test_encode_named_commands() {
        assert_eq!(encode_args(&["nop"]).unwrap(), [0]);
        assert_eq!(encode_args(&["exit"]).unwrap(), [1]);
        assert_eq!(encode_args(&["set", "voltage", "100"]).unwrap(), [2, 1, 100]);
        assert_eq!(encode_args(&["set", "circuit_breaker", "1"]).unwrap(), [2, 5, 1]);
        assert_eq!(encode_args(&["2", "17", "0x10"]).unwrap(), [2, 17, 16]);
    }

    #[test]
    fn test_encode_sends_tokens_as_given() {
        assert_eq!(encode_args(&["set", "voltage"]).unwrap(), [2, 1]);
        assert_eq!(encode_args(&["set"]).unwrap(), [2]);
        assert_eq!(encode_args(&["200"]).unwrap(), [200]);
    }

    #[test]
    fn test_aliases_only_resolve_for_set_address() {
        assert!(encode_args(&["set", "100", "voltage"]).is_err());
        assert!(encode_args(&["nop", "voltage"]).is_err());
    }

    #[test]
    fn test_encode_argument_count() {
        let none: [&str; 0] = [];
        assert!(matches!(encode_args(&none), Err(FirmwareError::MissingCommand)));
        assert!(matches!(
            encode_args(&["set", "1", "2", "3"]),
            Err(FirmwareError::TooManyArguments { max: 3, got: 4 })
        ));
    }
}
