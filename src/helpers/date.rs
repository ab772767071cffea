//! Date helper functions

use chrono::{Datelike, NaiveDate};

/// Full Thai month names, January first
pub const THAI_MONTHS_FULL: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Parse a post date. Accepts `YYYY-MM-DD` optionally followed by a time
/// part (`2024-01-15T08:00:00Z`).
pub fn parse_post_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Thai long date with a Buddhist Era year, e.g. `15 มกราคม 2567`
pub fn format_thai_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        THAI_MONTHS_FULL[date.month0() as usize],
        date.year() + 543
    )
}

/// Format a stored post date for display; unreadable dates render empty
pub fn display_post_date(value: &str) -> String {
    parse_post_date(value)
        .map(format_thai_date)
        .unwrap_or_default()
}
