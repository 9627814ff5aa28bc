//! Upstream timestamp parsing.
//!
//! Every provider has its own time format:
//! - opendata.ch sends ISO 8601 with a compact offset (`2024-03-15T10:30:00+0100`)
//! - iRail sends Unix epoch seconds as strings (`"1710495000"`)
//! - TransportAPI sends local `HH:MM` times plus a separate `YYYY-MM-DD` date
//!
//! All of them end up as `DateTime<Utc>`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Error returned when parsing an invalid upstream timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {value:?}: {reason}")]
pub struct TimeError {
    value: String,
    reason: &'static str,
}

impl TimeError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}

/// Parse an ISO 8601 timestamp with an explicit offset.
///
/// Accepts both `+01:00` and `+0100` offset styles.
///
/// # Examples
///
/// ```
/// use transport_server::domain::parse_offset_datetime;
///
/// let t = parse_offset_datetime("2024-03-15T10:30:00+0100").unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-03-15T09:30:00+00:00");
///
/// let t = parse_offset_datetime("2024-03-15T10:30:00+01:00").unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-03-15T09:30:00+00:00");
///
/// assert!(parse_offset_datetime("2024-03-15 10:30").is_err());
/// ```
pub fn parse_offset_datetime(s: &str) -> Result<DateTime<Utc>, TimeError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| TimeError::new(s, "expected ISO 8601 with offset"))
}

/// Parse Unix epoch seconds given as a decimal string.
pub fn parse_unix_seconds(s: &str) -> Result<DateTime<Utc>, TimeError> {
    let secs: i64 = s
        .trim()
        .parse()
        .map_err(|_| TimeError::new(s, "expected epoch seconds"))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| TimeError::new(s, "epoch out of range"))
}

/// Parse a `HH:MM` wall-clock time.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let s = s.trim();
    if s.len() != 5 {
        return Err(TimeError::new(s, "expected HH:MM format"));
    }
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| TimeError::new(s, "expected HH:MM format"))
}

/// Interpret a local date and time in `tz` and convert to UTC.
///
/// During the autumn DST overlap the earlier instant is chosen; a time that
/// falls in the spring gap is rejected.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<Utc>, TimeError> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| TimeError::new(&format!("{date} {time}"), "nonexistent local time"))
}

/// Move `candidate` forward a day if it appears to be more than twelve hours
/// before `anchor`, i.e. it belongs to the next service day.
///
/// Boards that only send `HH:MM` wrap at midnight: a 00:10 departure on a
/// board requested at 23:50 is tomorrow, not earlier today. At the end of
/// chrono's range the candidate is returned unchanged.
pub fn roll_past_midnight(anchor: DateTime<Utc>, candidate: DateTime<Utc>) -> DateTime<Utc> {
    if anchor - candidate > Duration::hours(12) {
        candidate
            .checked_add_signed(Duration::days(1))
            .unwrap_or(candidate)
    } else {
        candidate
    }
}
