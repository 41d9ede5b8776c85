use serde::Serialize;
use serde_json::Value;

use super::fields::{field, js_len, non_empty_str, optional_str, positive_int, validate_required_fields};
use super::{Record, Validation, ValidationError};

pub const MAX_PLANT_NAME_LENGTH: usize = 100;

const REQUIRED_FIELDS: &[&str] = &["plant_name", "plant_type_id"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidPlant {
    pub plant_name: String,
    pub plant_type_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialPlant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl PartialPlant {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn validate_plant(record: &Record) -> Validation<ValidPlant> {
    validate_required_fields(record, REQUIRED_FIELDS)?;

    Ok(ValidPlant {
        plant_name: plant_name(field(record, "plant_name"))?,
        plant_type_id: plant_type_id(field(record, "plant_type_id"))?,
        photo: optional_str(record, "photo"),
    })
}

pub fn validate_partial_plant(record: &Record) -> Validation<PartialPlant> {
    let mut update = PartialPlant::default();

    // A key set to null is a supplied value and fails its check.
    if let Some(value) = record.get("plant_name") {
        update.plant_name = Some(plant_name(value)?);
    }
    if let Some(value) = record.get("plant_type_id") {
        update.plant_type_id = Some(plant_type_id(value)?);
    }
    update.photo = optional_str(record, "photo");

    Ok(update)
}

fn plant_name(value: &Value) -> Validation<String> {
    let name = non_empty_str(value)
        .ok_or_else(|| ValidationError::bad_request("Plant name must be a non-empty string"))?;

    if js_len(name) > MAX_PLANT_NAME_LENGTH {
        return Err(ValidationError::bad_request(
            "Plant name must be 100 characters or less",
        ));
    }

    Ok(name.to_owned())
}

fn plant_type_id(value: &Value) -> Validation<i64> {
    positive_int(value).ok_or_else(|| ValidationError::bad_request("Invalid plant type ID"))
}
