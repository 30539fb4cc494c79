//! Sample rate parsing and rendering.
//!
//! `.dsl` headers carry rates as human strings (`"100 MHz"`), sigrok metadata
//! wants the same shape back. Internally the rate is always an integer in Hz.

use crate::error::{ConvertError, Result};

const UNITS: [(&str, u64); 4] = [
    ("GHz", 1_000_000_000),
    ("MHz", 1_000_000),
    ("kHz", 1_000),
    ("Hz", 1),
];

/// Parses `"500"`, `"500 Hz"`, `"1.5 MHz"`, `"100MHz"` and friends into Hz.
pub fn parse_samplerate(text: &str) -> Result<u64> {
    let bad = || ConvertError::MalformedHeader(format!("invalid samplerate '{}'", text));

    let trimmed = text.trim();
    let split_at = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split_at);
    let unit = unit.trim();

    let multiplier = if unit.is_empty() {
        1
    } else {
        UNITS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(unit))
            .map(|(_, m)| *m)
            .ok_or_else(bad)?
    };

    let number = number.trim();
    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier).ok_or_else(bad);
    }

    let value: f64 = number.parse().map_err(|_| bad())?;
    if !value.is_finite() || value < 0.0 {
        return Err(bad());
    }
    Ok((value * multiplier as f64).round() as u64)
}

/// Renders a rate the way sigrok prints one: the largest unit that divides it exactly.
pub fn format_samplerate(hz: u64) -> String {
    for (name, multiplier) in UNITS {
        if hz != 0 && hz % multiplier == 0 {
            return format!("{} {}", hz / multiplier, name);
        }
    }
    format!("{} Hz", hz)
}
