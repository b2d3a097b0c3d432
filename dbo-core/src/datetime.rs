use crate::{Error, Result};
use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem, macros::format_description,
};

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");
const TIMESTAMP_SUBSECOND: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
const TIMESTAMP_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const TIMESTAMP_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Text form of a timestamp parameter: `YYYY-MM-DD HH:MM:SS.fff`.
pub fn format_timestamp(value: &PrimitiveDateTime) -> Result<String> {
    value
        .format(TIMESTAMP)
        .map_err(|e| Error::conversion(format!("Cannot format timestamp {}: {}", value, e)))
}

/// Text form of a date parameter: `YYYY-MM-DD`.
pub fn format_date(value: &Date) -> Result<String> {
    value
        .format(DATE)
        .map_err(|e| Error::conversion(format!("Cannot format date {}: {}", value, e)))
}

/// Parse a stored timestamp, accepting a `T` separator, optional seconds and fraction,
/// or a bare date (midnight).
pub fn parse_timestamp(input: &str) -> Result<PrimitiveDateTime> {
    let normalized = input.trim().replacen('T', " ", 1);
    let normalized = normalized.trim_end_matches('Z');
    [TIMESTAMP_SUBSECOND, TIMESTAMP_SECONDS, TIMESTAMP_MINUTES]
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(normalized, *format).ok())
        .or_else(|| {
            Date::parse(normalized, DATE)
                .ok()
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        })
        .ok_or_else(|| Error::conversion(format!("Cannot parse '{}' as a timestamp", input)))
}

/// Parse a stored date, accepting a trailing time part which is discarded.
pub fn parse_date(input: &str) -> Result<Date> {
    let input = input.trim();
    let date = input.get(..10).unwrap_or(input);
    Date::parse(date, DATE)
        .map_err(|e| Error::conversion(format!("Cannot parse '{}' as a date: {}", input, e)))
}
