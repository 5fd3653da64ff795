//! Stored-timestamp parsing and display formatting.
//!
//! Stored answers hold timestamps in a strict ISO-8601-with-milliseconds
//! shape (`2024-06-07T09:30:00.000Z`). Anything else is not treated as a
//! date; the regex gate runs before any parsing so near-misses fall through
//! to plain-string handling.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDateTime};
use regex::Regex;

const STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn iso_regex() -> &'static Regex {
    static ISO: OnceLock<Regex> = OnceLock::new();
    ISO.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").unwrap()
    })
}

/// Day/month/year parts of a stored timestamp, as shown in a date input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    /// Day of month, 1-based.
    pub day: u32,
    /// Month, 1-based.
    pub month: u32,
    /// Full year.
    pub year: i32,
}

/// Returns true when `s` matches the strict stored-timestamp shape.
pub fn is_valid_date(s: &str) -> bool {
    iso_regex().is_match(s) && NaiveDateTime::parse_from_str(s, STORED_FORMAT).is_ok()
}

/// Split a stored timestamp into date-input parts.
pub fn parse_date(s: &str) -> Option<DateParts> {
    if !iso_regex().is_match(s) {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(s, STORED_FORMAT).ok()?;
    Some(DateParts {
        day: parsed.day(),
        month: parsed.month(),
        year: parsed.year(),
    })
}

/// Format a stored timestamp for display, e.g. `7 June 2024`.
pub fn format_date(s: &str) -> Option<String> {
    if !iso_regex().is_match(s) {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(s, STORED_FORMAT).ok()?;
    Some(parsed.format("%-d %B %Y").to_string())
}
