use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::dates::{ensure_ordered, parse_date_field, validate_date_range};
use super::fields::{
    field, non_empty_str, optional_bool, positive_int, present, validate_required_fields,
};
use super::{Record, Validation, ValidationError};
use crate::clock::Clock;

const REQUIRED_FIELDS: &[&str] = &["title", "start", "end"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidEvent {
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_weekly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_monthly: Option<bool>,
}

/// Fields of an event update. Only supplied fields are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_weekly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_monthly: Option<bool>,
}

impl PartialEvent {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn validate_event(record: &Record, clock: &dyn Clock) -> Validation<ValidEvent> {
    validate_required_fields(record, REQUIRED_FIELDS)?;

    let title = non_empty_str(field(record, "title")).ok_or_else(invalid_title)?;

    let range = validate_date_range(field(record, "start"), field(record, "end"), clock)?;

    let plant_id = match present(record, "plantId") {
        Some(value) => Some(positive_int(value).ok_or_else(invalid_plant_id)?),
        None => None,
    };

    let repeat_weekly = optional_bool(record, "repeatWeekly");
    let repeat_monthly = optional_bool(record, "repeatMonthly");
    ensure_single_repeat(repeat_weekly, repeat_monthly)?;

    Ok(ValidEvent {
        title: title.to_owned(),
        start: range.start,
        end: range.end,
        plant_id,
        repeat_weekly,
        repeat_monthly,
    })
}

/// Update variant: past start dates are allowed, ordering is only checked
/// when both ends are supplied, and the repeat flags only conflict when both
/// are supplied as `true` in this call. A key present with `null` counts as
/// supplied and must pass its check.
pub fn validate_partial_event(record: &Record, clock: &dyn Clock) -> Validation<PartialEvent> {
    let local = *clock.now().offset();
    let mut update = PartialEvent::default();

    if let Some(value) = record.get("title") {
        update.title = Some(non_empty_str(value).ok_or_else(invalid_title)?.to_owned());
    }

    if let Some(value) = record.get("start") {
        update.start = Some(parse_date_field(value, &local)?);
    }

    if let Some(value) = record.get("end") {
        update.end = Some(parse_date_field(value, &local)?);
    }

    if let (Some(start), Some(end)) = (&update.start, &update.end) {
        ensure_ordered(start, end)?;
    }

    if let Some(value) = record.get("plantId") {
        update.plant_id = Some(positive_int(value).ok_or_else(invalid_plant_id)?);
    }

    update.repeat_weekly = optional_bool(record, "repeatWeekly");
    update.repeat_monthly = optional_bool(record, "repeatMonthly");
    ensure_single_repeat(update.repeat_weekly, update.repeat_monthly)?;

    Ok(update)
}

fn ensure_single_repeat(weekly: Option<bool>, monthly: Option<bool>) -> Validation<()> {
    if weekly == Some(true) && monthly == Some(true) {
        Err(ValidationError::bad_request(
            "Event cannot repeat both weekly and monthly",
        ))
    } else {
        Ok(())
    }
}

fn invalid_title() -> ValidationError {
    ValidationError::bad_request("Title must be a non-empty string")
}

fn invalid_plant_id() -> ValidationError {
    ValidationError::bad_request("Invalid plant ID")
}
