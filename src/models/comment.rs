use serde::Serialize;

use super::fields::{field, js_len, optional_str, validate_required_fields};
use super::post::MAX_CONTENT_LENGTH;
use super::{Record, Validation, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidComment {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Comment bodies may be empty (a photo-only comment) but must be strings.
pub fn validate_comment(record: &Record) -> Validation<ValidComment> {
    validate_required_fields(record, &["content"])?;

    let content = field(record, "content")
        .as_str()
        .ok_or_else(|| ValidationError::bad_request("Content must be a string"))?;

    if js_len(content) > MAX_CONTENT_LENGTH {
        return Err(ValidationError::bad_request(
            "Content must be 10000 characters or less",
        ));
    }

    Ok(ValidComment {
        content: content.to_owned(),
        photo: optional_str(record, "photo"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_comment() {
        let comment = validate_comment(&record(json!({"content": "Lovely leaves", "photo": "a.webp"})))
            .unwrap();
        assert_eq!(comment.content, "Lovely leaves");
        assert_eq!(comment.photo.as_deref(), Some("a.webp"));
    }

    #[test]
    fn test_empty_content_is_present() {
        assert!(validate_comment(&record(json!({"content": ""}))).is_ok());
    }

    #[test]
    fn test_missing_content() {
        let err = validate_comment(&record(json!({"photo": "a.png"}))).unwrap_err();
        assert_eq!(err.error, "Missing required fields: content");
    }

    #[test]
    fn test_non_string_content() {
        let err = validate_comment(&record(json!({"content": 5}))).unwrap_err();
        assert_eq!(err.error, "Content must be a string");
    }

    #[test]
    fn test_content_limit() {
        let long = "x".repeat(MAX_CONTENT_LENGTH + 1);
        let err = validate_comment(&record(json!({"content": long}))).unwrap_err();
        assert_eq!(err.error, "Content must be 10000 characters or less");
    }
}
