//! JSON command decoding
//!
//! A line is parsed into a [`serde_json::Value`] tree and queried field by
//! field. Validation stops at the first problem found.

use core::fmt;

use serde_json::Value;

use crate::types::{Command, Field, Update};

/// Reason a command line was rejected
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Line is not valid JSON
    MalformedJson,
    /// `command_number` absent or not an integer
    MissingCommandNumber,
    /// Optional field present with the wrong type
    InvalidField(Field),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedJson => write!(f, "Error creating json from command buffer"),
            DecodeError::MissingCommandNumber => write!(f, "Error parsing command number"),
            DecodeError::InvalidField(Field::EnableOut) => write!(f, "Error parsing enable flag."),
            DecodeError::InvalidField(Field::Frequency) => write!(f, "Error parsing frequency."),
            DecodeError::InvalidField(Field::Phase) => write!(f, "Error parsing phase"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Decode one completed command line.
///
/// Never fails: problems come back as [`Command::Reject`]. A line that is
/// not JSON, or has no usable `command_number`, is rejected under number 0.
pub fn decode_command(line: &[u8]) -> Command {
    let json: Value = match serde_json::from_slice(line) {
        Ok(json) => json,
        Err(_) => return reject(0, DecodeError::MalformedJson),
    };

    let Some(command_number) = json.get("command_number").and_then(as_integer) else {
        return reject(0, DecodeError::MissingCommandNumber);
    };

    match decode_fields(&json, command_number) {
        Ok(update) => Command::Apply(update),
        Err(error) => reject(command_number, error),
    }
}

/// Optional fields, checked in the order `enable_out`, `frequency`, `phase`
fn decode_fields(json: &Value, command_number: i64) -> Result<Update, DecodeError> {
    let mut update = Update::new(command_number);

    if let Some(value) = json.get(Field::EnableOut.key()) {
        let enable = value.as_bool().ok_or(DecodeError::InvalidField(Field::EnableOut))?;
        update.enable_out = Some(enable);
    }

    if let Some(value) = json.get(Field::Frequency.key()) {
        let hz = as_u32(value).ok_or(DecodeError::InvalidField(Field::Frequency))?;
        update.frequency_hz = Some(hz);
    }

    if let Some(value) = json.get(Field::Phase.key()) {
        let phase = as_u32(value).ok_or(DecodeError::InvalidField(Field::Phase))?;
        update.phase_centideg = Some(phase);
    }

    Ok(update)
}

/// Any JSON integer. Values past `i64::MAX` wrap around.
fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|v| v as i64))
}

/// Any JSON integer, truncated to its low 32 bits (`-1` becomes `u32::MAX`)
fn as_u32(value: &Value) -> Option<u32> {
    as_integer(value).map(|v| v as u32)
}

fn reject(command_number: i64, error: DecodeError) -> Command {
    #[cfg(feature = "defmt")]
    defmt::debug!("Rejecting command {}: {}", command_number, error);

    Command::Reject {
        command_number,
        error,
    }
}
