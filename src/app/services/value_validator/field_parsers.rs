//! Per-type normalization helpers
//!
//! Each helper returns the normalized output string on success and `None`
//! when the value does not conform to its declared type. Normalization never
//! mutates its input; callers decide whether `None` becomes the null
//! sentinel or only a recorded violation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::constants::{
    DATE_FORMAT, OUTPUT_DELIMITER, TIME_FORMATS, TIMESTAMP_FORMATS, ZERO_LOOKALIKE,
};

/// Normalize an integer value.
///
/// The OCR step upstream renders some zeros as the letter `O`; those are
/// substituted before parsing, and the substituted string is the output, so
/// `O42` normalizes to `042`.
pub fn normalize_integer(value: &str) -> Option<String> {
    let substituted = value.replace(ZERO_LOOKALIKE, "0");
    substituted.parse::<i64>().ok().map(|_| substituted)
}

/// Normalize a `timestamp without time zone` value.
///
/// Accepts ISO 8601 date-times (space or `T` separated, optional fractional
/// seconds) and bare dates. Conforming values pass through unchanged.
pub fn normalize_timestamp(value: &str) -> Option<String> {
    for format in TIMESTAMP_FORMATS {
        if NaiveDateTime::parse_from_str(value, format).is_ok() {
            return Some(value.to_string());
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|_| value.to_string())
}

/// Normalize a `time without time zone` value.
///
/// Legacy exports write times as bare 4-digit values (`1430`) or unpadded
/// `H:MM` (`9:30`). Both are re-delimited into `HH:MM` before parsing, and
/// the normalized `HH:MM` form is the output.
pub fn normalize_time(value: &str) -> Option<String> {
    let candidate = if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}:{}", &value[..2], &value[2..])
    } else if value.len() == 4 && value.contains(':') {
        format!("0{value}")
    } else {
        value.to_string()
    };

    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(&candidate, format) {
            return Some(time.format("%H:%M").to_string());
        }
    }
    None
}

/// Strip the output field delimiter from a free-text value.
///
/// The pipe is the only character illegal in the serialized output.
pub fn strip_pipes(value: &str) -> String {
    if value.contains(OUTPUT_DELIMITER) {
        value.replace(OUTPUT_DELIMITER, "")
    } else {
        value.to_string()
    }
}
