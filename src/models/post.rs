use serde::Serialize;
use serde_json::Value;

use super::fields::{
    field, js_len, non_empty_str, optional_str, positive_int, validate_required_fields,
};
use super::{Record, Validation, ValidationError};

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_CONTENT_LENGTH: usize = 10_000;

const REQUIRED_FIELDS: &[&str] = &["title", "content", "plant_id"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidPost {
    pub title: String,
    pub content: String,
    pub plant_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl PartialPost {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn validate_post(record: &Record) -> Validation<ValidPost> {
    validate_required_fields(record, REQUIRED_FIELDS)?;

    Ok(ValidPost {
        title: title(field(record, "title"))?,
        content: content(field(record, "content"))?,
        plant_id: plant_id(field(record, "plant_id"))?,
        photo: optional_str(record, "photo"),
    })
}

pub fn validate_partial_post(record: &Record) -> Validation<PartialPost> {
    let mut update = PartialPost::default();

    if let Some(value) = record.get("title") {
        update.title = Some(title(value)?);
    }
    if let Some(value) = record.get("content") {
        update.content = Some(content(value)?);
    }
    if let Some(value) = record.get("plant_id") {
        update.plant_id = Some(plant_id(value)?);
    }
    update.photo = optional_str(record, "photo");

    Ok(update)
}

fn title(value: &Value) -> Validation<String> {
    let title = non_empty_str(value)
        .ok_or_else(|| ValidationError::bad_request("Title must be a non-empty string"))?;
    if js_len(title) > MAX_TITLE_LENGTH {
        return Err(ValidationError::bad_request(
            "Title must be 100 characters or less",
        ));
    }
    Ok(title.to_owned())
}

fn content(value: &Value) -> Validation<String> {
    let content = non_empty_str(value)
        .ok_or_else(|| ValidationError::bad_request("Content must be a non-empty string"))?;
    if js_len(content) > MAX_CONTENT_LENGTH {
        return Err(ValidationError::bad_request(
            "Content must be 10000 characters or less",
        ));
    }
    Ok(content.to_owned())
}

fn plant_id(value: &Value) -> Validation<i64> {
    positive_int(value).ok_or_else(|| ValidationError::bad_request("Invalid plant ID"))
}
