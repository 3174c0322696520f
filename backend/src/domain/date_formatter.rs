//! Date and time conversions between epoch millis, the ISO-8601 strings
//! stored with bills and balances, and the strings shown to the user.
//!
//! Storage strings are always UTC (`yyyy-MM-ddTHH:mm:ss`). Display strings
//! use the local zone unless a zone is passed explicitly.
//!
//! Nothing here returns an error. Parsers fall back to a sentinel: `0` for
//! timestamps, `""` for strings, [`SELECT_TIME_PLACEHOLDER`] for time
//! pickers. Callers must treat `0` and `""` as "absent".

use crate::domain::numeric_formatter::day_ordinal;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::fmt::Display;

pub const ISO_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";
pub const TIME_24_HOUR_FORMAT: &str = "%H:%M:%S";
pub const TIME_12_HOUR_FORMAT: &str = "%I:%M %p";

pub const SELECT_TIME_PLACEHOLDER: &str = "Select time";
pub const INVALID_DATE: &str = "Invalid date";

/// Byte range of the day of month in `yyyy-MM-ddTHH:mm:ss`
const DAY_OF_MONTH_RANGE: std::ops::Range<usize> = 8..10;

pub fn current_time_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Epoch millis → `yyyy-MM-ddTHH:mm:ss` in UTC, `""` when out of range
pub fn convert_date_millis_to_iso_string(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format(ISO_DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// ISO-8601 string → epoch millis, `0` when unparsable.
///
/// Strings without an offset are read as UTC. A bare `yyyy-MM-dd` is
/// midnight UTC.
pub fn iso_string_to_timestamp(iso: &str) -> i64 {
    let trimmed = iso.trim();
    if trimmed.is_empty() {
        return 0;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.timestamp_millis();
    }

    for format in [ISO_DATE_TIME_FORMAT, "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return naive.and_utc().timestamp_millis();
        }
    }

    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// `"2025-03-21T00:00:00"` → `"Every 21st day of the month"`
pub fn format_recurring_day(iso: &str) -> String {
    let day = iso
        .get(DAY_OF_MONTH_RANGE)
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|day| (1..=31).contains(day));

    match day {
        Some(day) => format!("Every {} day of the month", day_ordinal(day)),
        None => INVALID_DATE.to_string(),
    }
}

/// `"14:30:00"` → `"02:30 PM"`; unparsable input gives the time picker placeholder
pub fn convert_24_to_12_hour(time: &str) -> String {
    parse_24_hour(time)
        .map(|t| t.format(TIME_12_HOUR_FORMAT).to_string())
        .unwrap_or_else(|| SELECT_TIME_PLACEHOLDER.to_string())
}

/// `"02:30 PM"` → `"14:30:00"`; unparsable input gives `""`
pub fn convert_12_to_24_hour(time: &str) -> String {
    NaiveTime::parse_from_str(time.trim(), TIME_12_HOUR_FORMAT)
        .map(|t| t.format(TIME_24_HOUR_FORMAT).to_string())
        .unwrap_or_default()
}

/// Epoch millis → `"Mar 21, 2025"` in the local zone
pub fn format_display_date(millis: i64) -> String {
    format_display_date_in(millis, &Local)
}

pub fn format_display_date_in<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format_millis_in(millis, tz, DISPLAY_DATE_FORMAT)
}

/// Epoch millis → `"02:30 PM"` in the local zone
pub fn format_display_time(millis: i64) -> String {
    format_display_time_in(millis, &Local)
}

pub fn format_display_time_in<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format_millis_in(millis, tz, TIME_12_HOUR_FORMAT)
}

/// `"Mar 21, 2025"` → epoch millis of local midnight, `0` when unparsable
pub fn parse_display_date(text: &str) -> i64 {
    parse_display_date_in(text, &Local)
}

pub fn parse_display_date_in<Tz: TimeZone>(text: &str, tz: &Tz) -> i64 {
    NaiveDate::parse_from_str(text.trim(), DISPLAY_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

fn format_millis_in<Tz>(millis: i64, tz: &Tz, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if millis == 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(tz).format(format).to_string())
        .unwrap_or_default()
}

fn parse_24_hour(time: &str) -> Option<NaiveTime> {
    let trimmed = time.trim();
    NaiveTime::parse_from_str(trimmed, TIME_24_HOUR_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}
