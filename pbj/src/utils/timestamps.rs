//! Timestamp utilities for the date-time, timestamp and microtime kinds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// A UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Largest accepted unix timestamp (9999-12-31T23:59:59Z).
pub const MAX_UNIX_SECONDS: i64 = 253_402_300_799;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Current unix time in seconds.
#[must_use]
pub fn now_unix_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Current unix time in microseconds.
#[must_use]
pub fn now_microtime() -> i64 {
    Utc::now().timestamp_micros()
}

/// Formats a timestamp as ISO 8601 with microsecond precision:
/// `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`.
#[must_use]
pub fn format_iso8601(dt: &Timestamp) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Parses an ISO 8601 date-time. Strings without an offset are read as UTC.
///
/// # Errors
///
/// Returns `TimestampError` if the input cannot be parsed.
pub fn parse_iso8601(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    // Handle 'Z' suffix by replacing with +00:00
    let normalized = trimmed.replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%:z",
    ];
    for fmt in formats {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in naive_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(TimestampError::InvalidFormat(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso8601_zulu() {
        let dt = parse_iso8601("2023-10-05T14:30:00Z").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 10);
        assert_eq!(dt.day(), 5);
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn test_parse_iso8601_offset_converts_to_utc() {
        let dt = parse_iso8601("2023-10-05T14:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_iso8601("2023-10-05").unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(matches!(parse_iso8601("  "), Err(TimestampError::EmptyString)));
        assert!(matches!(parse_iso8601("yesterday"), Err(TimestampError::InvalidFormat(_))));
    }

    #[test]
    fn test_format_keeps_microseconds() {
        let dt = Utc.timestamp_opt(1_419_509_520, 123_456_000).single().unwrap();
        assert_eq!(format_iso8601(&dt), "2014-12-25T12:12:00.123456+00:00");
    }

    #[test]
    fn test_now_helpers_agree() {
        let secs = now_unix_seconds();
        let micros = now_microtime();
        assert!((micros / 1_000_000 - secs).abs() <= 1);
    }
}
