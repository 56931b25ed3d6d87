//! Time-of-day parsing and window label formatting.
//!
//! Input stamps carry only a 12-hour clock time (`9:10 am`). They are turned
//! into absolute instants by pinning them to an anchor date chosen once per
//! run. Both the instant and its rendering use a UTC clock, so a label reads
//! the same wall-clock time as the input regardless of the host time zone.

use crate::error::{Error, Result};
use crate::types::TimestampMs;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// `h:mm` or `hh:mm`, optional whitespace, am/pm marker.
static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(1[0-2]|0?[1-9]):([0-5][0-9])\s?(am|pm)$").expect("clock pattern compiles")
});

/// Rendering used for each end of a window label.
const CLOCK_FORMAT: &str = "%I:%M %p";

/// Converts clock strings into instants on a fixed anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampNormalizer {
    anchor_date: NaiveDate,
}

impl TimestampNormalizer {
    /// Create a normalizer pinned to `anchor_date`.
    pub fn new(anchor_date: NaiveDate) -> Self {
        Self { anchor_date }
    }

    /// The date every stamp is anchored to.
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    /// Normalize a clock string into epoch milliseconds.
    pub fn normalize(&self, text: &str) -> Result<TimestampMs> {
        normalize(text, self.anchor_date)
    }
}

/// Validate `text` as a 12-hour clock time and pin it to `anchor_date`.
pub fn normalize(text: &str, anchor_date: NaiveDate) -> Result<TimestampMs> {
    if text.is_empty() {
        return Err(Error::invalid_timestamp("timestamp is empty"));
    }
    let caps = CLOCK_PATTERN.captures(text).ok_or_else(|| {
        Error::invalid_timestamp(format!("'{}' is not a 12-hour clock time", text))
    })?;

    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| Error::invalid_timestamp(format!("bad hour in '{}'", text)))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| Error::invalid_timestamp(format!("bad minute in '{}'", text)))?;
    let is_pm = caps[3].eq_ignore_ascii_case("pm");

    let hour_24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    let time = NaiveTime::from_hms_opt(hour_24, minute, 0)
        .ok_or_else(|| Error::invalid_timestamp(format!("'{}' is out of range", text)))?;

    Ok(anchor_date.and_time(time).and_utc().timestamp_millis())
}

/// Render an instant as a zero-padded 12-hour clock, e.g. `09:00 AM`.
pub fn format_clock(ts_ms: TimestampMs) -> Result<String> {
    let instant = Utc
        .timestamp_millis_opt(ts_ms)
        .single()
        .ok_or_else(|| Error::invalid_timestamp(format!("instant {} is out of range", ts_ms)))?;
    Ok(instant.format(CLOCK_FORMAT).to_string())
}

/// Label for the window `[start_ms, end_ms)`, e.g. `09:00 AM - 10:00 AM`.
pub fn window_label(start_ms: TimestampMs, end_ms: TimestampMs) -> Result<String> {
    Ok(format!("{} - {}", format_clock(start_ms)?, format_clock(end_ms)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    // 2024-01-01 00:00:00 UTC
    const MIDNIGHT_MS: i64 = 1_704_067_200_000;
    const HOUR_MS: i64 = 3_600_000;
    const MINUTE_MS: i64 = 60_000;

    #[test]
    fn test_morning_time() {
        let ts = normalize("9:10 am", anchor()).unwrap();
        assert_eq!(ts, MIDNIGHT_MS + 9 * HOUR_MS + 10 * MINUTE_MS);
    }

    #[test]
    fn test_afternoon_and_noon() {
        assert_eq!(
            normalize("1:05 PM", anchor()).unwrap(),
            MIDNIGHT_MS + 13 * HOUR_MS + 5 * MINUTE_MS
        );
        assert_eq!(
            normalize("12:00 pm", anchor()).unwrap(),
            MIDNIGHT_MS + 12 * HOUR_MS
        );
        assert_eq!(normalize("12:30 am", anchor()).unwrap(), MIDNIGHT_MS + 30 * MINUTE_MS);
    }

    #[test]
    fn test_marker_spacing_and_case() {
        let spaced = normalize("10:45 Am", anchor()).unwrap();
        let packed = normalize("10:45am", anchor()).unwrap();
        assert_eq!(spaced, packed);
    }

    #[test]
    fn test_leading_zero_hour() {
        assert_eq!(
            normalize("09:10 am", anchor()).unwrap(),
            normalize("9:10 am", anchor()).unwrap()
        );
    }

    #[test]
    fn test_missing_marker_rejected() {
        let err = normalize("10:10", anchor()).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp(_)));
    }

    #[test]
    fn test_invalid_hour_rejected() {
        assert!(matches!(
            normalize("14:10 am", anchor()),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(matches!(
            normalize("0:10 am", anchor()),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(matches!(
            normalize("9:60 am", anchor()),
            Err(Error::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(normalize("", anchor()), Err(Error::InvalidTimestamp(_))));
    }

    #[test]
    fn test_trailing_text_rejected() {
        assert!(matches!(
            normalize("9:10 am UTC", anchor()),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(matches!(
            normalize("9:10  am", anchor()),
            Err(Error::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_anchor_date_is_explicit() {
        let day1 = TimestampNormalizer::new(anchor());
        let day2 = TimestampNormalizer::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let diff = day2.normalize("9:10 am").unwrap() - day1.normalize("9:10 am").unwrap();
        assert_eq!(diff, 24 * HOUR_MS);
    }

    #[test]
    fn test_window_label() {
        let start = normalize("9:00 am", anchor()).unwrap();
        let label = window_label(start, start + HOUR_MS).unwrap();
        assert_eq!(label, "09:00 AM - 10:00 AM");
    }

    #[test]
    fn test_window_label_across_noon_and_midnight() {
        let start = normalize("11:30 am", anchor()).unwrap();
        assert_eq!(window_label(start, start + HOUR_MS).unwrap(), "11:30 AM - 12:30 PM");

        let late = normalize("11:15 pm", anchor()).unwrap();
        assert_eq!(window_label(late, late + HOUR_MS).unwrap(), "11:15 PM - 12:15 AM");
    }
}
