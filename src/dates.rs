//! Race date parsing and display.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a race date as sent by the API.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_race_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Format a race date as "14 March 2026". Unreadable input yields "".
pub fn format_race_date(raw: Option<&str>) -> String {
    raw.and_then(parse_race_date)
        .map(|d| d.format("%-d %B %Y").to_string())
        .unwrap_or_default()
}
