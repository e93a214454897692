//! Position payload codec
//!
//! Positions travel as three culture-invariant decimals joined by `;`. The
//! legacy `,` form is still accepted on input.

use crate::error::DecodeError;
use crate::types::Position;

/// Preferred field separator
pub const SEPARATOR: char = ';';

/// Separator used by older senders
pub const LEGACY_SEPARATOR: char = ',';

/// Encode a position with the preferred separator
pub fn encode_position(position: &Position) -> String {
    join(position, SEPARATOR)
}

/// Encode a position with the legacy separator
pub fn encode_position_legacy(position: &Position) -> String {
    join(position, LEGACY_SEPARATOR)
}

fn join(position: &Position, separator: char) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        position.x,
        position.y,
        position.z,
        sep = separator
    )
}

/// Decode a position, trying `;` first and falling back to `,`
pub fn decode_position(payload: &str) -> Result<Position, DecodeError> {
    let values = decode_triple(payload)?;
    Ok(Position::new(values[0], values[1], values[2]))
}

/// Decode any three-number payload; `inf` is allowed so bid replies can carry it
pub(crate) fn decode_triple_allow_infinite(payload: &str) -> Result<[f64; 3], DecodeError> {
    let parts = split_fields(payload)?;
    let mut values = [0.0; 3];
    for (slot, part) in values.iter_mut().zip(parts.iter()) {
        let value = parse_number(payload, part)?;
        if value.is_nan() {
            return Err(invalid(payload, part));
        }
        *slot = value;
    }
    Ok(values)
}

fn decode_triple(payload: &str) -> Result<[f64; 3], DecodeError> {
    let parts = split_fields(payload)?;
    let mut values = [0.0; 3];
    for (slot, part) in values.iter_mut().zip(parts.iter()) {
        let value = parse_number(payload, part)?;
        if !value.is_finite() {
            return Err(invalid(payload, part));
        }
        *slot = value;
    }
    Ok(values)
}

fn split_fields(payload: &str) -> Result<Vec<&str>, DecodeError> {
    let mut parts: Vec<&str> = payload.split(SEPARATOR).collect();
    if parts.len() != 3 {
        parts = payload.split(LEGACY_SEPARATOR).collect();
    }
    if parts.len() != 3 {
        return Err(DecodeError::WrongArity {
            payload: payload.to_string(),
            found: parts.len(),
        });
    }
    Ok(parts)
}

fn parse_number(payload: &str, part: &str) -> Result<f64, DecodeError> {
    part.trim().parse::<f64>().map_err(|_| invalid(payload, part))
}

fn invalid(payload: &str, part: &str) -> DecodeError {
    DecodeError::InvalidNumber {
        payload: payload.to_string(),
        value: part.trim().to_string(),
    }
}
