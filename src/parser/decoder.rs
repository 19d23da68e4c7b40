//! Field decoders for the logger's float table
//!
//! Values are little-endian IEEE-754 doubles, dates are `YYYYMMDD` text and
//! times are copied through as text.

use crate::error::{Result, TranscribeError};
use chrono::NaiveDate;

/// Decimal places kept for channel values
pub const VALUE_DECIMALS: usize = 8;
/// Date format stored in the table
pub const TABLE_DATE_FORMAT: &str = "%Y%m%d";
/// Date format written to the CSV
pub const OUTPUT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Decode an 8-byte little-endian double
pub fn decode_value(bytes: &[u8]) -> Result<f64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        TranscribeError::record_decode(format!(
            "value field is {} bytes, expected 8",
            bytes.len()
        ))
    })?;
    let value = f64::from_le_bytes(raw);
    if !value.is_finite() {
        return Err(TranscribeError::record_decode(format!(
            "value bit pattern {:#018x} is not a finite number",
            u64::from_le_bytes(raw)
        )));
    }
    Ok(value)
}

/// Render a value rounded to [`VALUE_DECIMALS`] places.
///
/// The rounded value is written with the fewest digits that read back to the
/// same double. Whole numbers keep a `.0`, the sign of zero is kept, and
/// magnitudes below `1e-4` or from `1e16` up use exponent form (`1e-05`).
pub fn format_value(value: f64) -> String {
    let rounded: f64 = format!("{:.*}", VALUE_DECIMALS, value)
        .parse()
        .unwrap_or(value);

    let scientific = format!("{:e}", rounded);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if rounded != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs());
    }

    let mut text = rounded.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Decode and render a raw value field in one step
pub fn decode_value_text(bytes: &[u8]) -> Result<String> {
    decode_value(bytes).map(format_value)
}

/// Decode a `YYYYMMDD` date field into the output date format
pub fn decode_date(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| TranscribeError::record_decode("date field is not ASCII text"))?
        .trim();
    let date = NaiveDate::parse_from_str(text, TABLE_DATE_FORMAT).map_err(|err| {
        TranscribeError::record_decode(format!("invalid date '{}': {}", text, err))
    })?;
    Ok(date.format(OUTPUT_DATE_FORMAT).to_string())
}

/// Time fields are copied through verbatim
pub fn decode_time(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| TranscribeError::record_decode("time field is not ASCII text"))
}

/// Decode a space- or NUL-padded text field
pub fn decode_padded_text(bytes: &[u8]) -> String {
    let text: String = bytes.iter().map(|&b| b as char).collect();
    text.trim_end_matches(|c: char| c == '\0' || c == ' ').to_string()
}
