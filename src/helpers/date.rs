//! Date helper functions
//!
//! Posts are stamped with a calendar date on insertion and always displayed
//! in that same `YYYY-MM-DD` form. Older databases may hold a full timestamp
//! in `date_added`, so reading accepts a few timestamp layouts and truncates.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// chrono format of the stored and displayed post date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in [`DATE_FORMAT`]
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Parse a stored date or timestamp into a calendar date
pub fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Re-emit a stored date in [`DATE_FORMAT`]
pub fn display_date(value: &str) -> Option<String> {
    parse_stored_date(value).map(|date| date.format(DATE_FORMAT).to_string())
}

/// Format a stored date as RFC 2822 (midnight, local time) for RSS feeds
pub fn rfc2822(value: &str) -> Option<String> {
    let date = parse_stored_date(value)?;
    let midnight = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.to_rfc2822())
}
