//! Conversion between user-facing decimal amounts and integer base units.
//!
//! Parsing is exact: the text is split into whole and fractional digits and
//! scaled with integer arithmetic, never through a float. Fractional digits
//! past `decimals` are dropped (rounded toward zero).

use crate::error::SolError;

/// SOL has 9 decimals: 1 SOL = 1_000_000_000 lamports.
pub const NATIVE_DECIMALS: u8 = 9;

/// Largest decimal count accepted for a token.
pub const MAX_DECIMALS: u8 = 18;

pub fn check_decimals(decimals: u8) -> Result<u8, SolError> {
    if decimals > MAX_DECIMALS {
        return Err(SolError::InvalidDecimals(decimals));
    }
    Ok(decimals)
}

/// Parse `text` (e.g. `"0.000000001"`) into base units with `decimals` places.
///
/// Accepts `123`, `1.5`, `.5` and `5.`. Signs, exponents, separators and
/// empty input are rejected, as is any amount that is zero after scaling or
/// does not fit in a `u64`.
pub fn parse_amount(text: &str, decimals: u8) -> Result<u64, SolError> {
    let decimals = check_decimals(decimals)?;
    let trimmed = text.trim();

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(SolError::InvalidAmount(format!(
            "{trimmed:?} is not a decimal number"
        )));
    }

    let overflow = || SolError::InvalidAmount(format!("{trimmed} is too large"));

    let mut units: u64 = 0;
    for digit in whole.bytes() {
        units = units
            .checked_mul(10)
            .and_then(|u| u.checked_add(u64::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }

    let places = usize::from(decimals);
    let kept = frac.get(..places.min(frac.len())).unwrap_or("");
    for i in 0..places {
        let digit = kept.as_bytes().get(i).map_or(0, |d| d - b'0');
        units = units
            .checked_mul(10)
            .and_then(|u| u.checked_add(u64::from(digit)))
            .ok_or_else(overflow)?;
    }

    if units == 0 {
        return Err(SolError::InvalidAmount(format!(
            "{trimmed} must be greater than zero"
        )));
    }

    Ok(units)
}

/// Render base units as a decimal string without trailing zeros.
pub fn format_amount(units: u64, decimals: u8) -> String {
    let digits = units.to_string();
    let places = usize::from(decimals);
    if places == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = places + 1);
    let (whole, frac) = padded.split_at(padded.len() - places);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}
