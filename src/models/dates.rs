//! Date parsing and range checks for calendar events.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use serde_json::Value;

use super::{Validation, ValidationError};
use crate::clock::Clock;

/// Offset-less forms are read in the clock's local offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Checks that both ends parse, that they are ordered, and that the start
/// does not fall on a calendar day before the clock's today.
pub fn validate_date_range(start: &Value, end: &Value, clock: &dyn Clock) -> Validation<DateRange> {
    let now = clock.now();
    let local = *now.offset();

    let (Some(start), Some(end)) = (parse_instant(start, &local), parse_instant(end, &local)) else {
        return Err(invalid_date_format());
    };

    ensure_ordered(&start, &end)?;

    if start.with_timezone(&local).date_naive() < now.date_naive() {
        return Err(ValidationError::bad_request(
            "Start time cannot be before today",
        ));
    }

    Ok(DateRange { start, end })
}

pub(crate) fn ensure_ordered(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
) -> Validation<()> {
    if start > end {
        Err(ValidationError::bad_request(
            "Start time must be earlier than end time",
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn parse_date_field(value: &Value, local: &FixedOffset) -> Validation<DateTime<FixedOffset>> {
    parse_instant(value, local).ok_or_else(invalid_date_format)
}

fn invalid_date_format() -> ValidationError {
    ValidationError::bad_request("Invalid date format")
}

/// Accepts RFC 3339 strings, offset-less date-times, bare dates (UTC
/// midnight) and epoch milliseconds.
pub(crate) fn parse_instant(value: &Value, local: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(raw) => parse_date_str(raw.trim(), local),
        Value::Number(number) => {
            let millis = number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.is_finite())
                    .map(|float| float.trunc() as i64)
            })?;
            DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(local))
        }
        _ => None,
    }
}

fn parse_date_str(raw: &str, local: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local.from_local_datetime(&naive).single();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(local))
}
