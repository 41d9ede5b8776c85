//! Field-level decoders shared by the entity validators.
//!
//! Each helper inspects one `serde_json::Value` and either yields the typed
//! value or nothing; the entity validators attach the error message.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{Record, Validation, ValidationError};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

static NULL: Value = Value::Null;

/// The field value, with absent fields reading as `null`.
pub(crate) fn field<'a>(record: &'a Record, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&NULL)
}

/// Returns the field value unless it is absent or `null`.
pub(crate) fn present<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}

/// Reports every missing field at once. Empty strings and `0` count as present.
pub fn validate_required_fields(record: &Record, fields: &[&str]) -> Validation<()> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| present(record, field).is_none())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Loose syntactic check: `local@domain.tld` with no whitespace and a single `@`
/// on each side of the dot-separated domain. Not RFC 5322.
pub fn validate_email(value: &Value) -> Validation<()> {
    match value.as_str() {
        Some(email) if EMAIL_PATTERN.is_match(email) => Ok(()),
        _ => Err(ValidationError::bad_request("Invalid email format")),
    }
}

/// Coerces an id-like value to a positive integer.
pub fn validate_id(value: &Value) -> Validation<i64> {
    positive_int(value).ok_or_else(|| ValidationError::bad_request("Invalid ID format"))
}

/// Same as [`validate_id`] for a raw path segment.
pub fn validate_id_param(raw: &str) -> Validation<i64> {
    parse_int_prefix(raw)
        .filter(|id| *id > 0)
        .ok_or_else(|| ValidationError::bad_request("Invalid ID format"))
}

pub(crate) fn positive_int(value: &Value) -> Option<i64> {
    coerce_int(value).filter(|number| *number > 0)
}

/// Integer coercion with `parseInt` semantics: numbers are truncated, strings
/// yield their leading integer prefix, everything else has no integer value.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(raw) => parse_int_prefix(raw),
        _ => None,
    }
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }

    // Only overflow can fail here; saturate like a float would.
    let magnitude = unsigned[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// A string with at least one non-whitespace character, returned as given.
pub(crate) fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|text| !text.trim().is_empty())
}

/// Optional string field; a wrong type is tolerated as absent.
pub(crate) fn optional_str(record: &Record, field: &str) -> Option<String> {
    present(record, field)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Optional boolean field; a wrong type is tolerated as absent.
pub(crate) fn optional_bool(record: &Record, field: &str) -> Option<bool> {
    present(record, field).and_then(Value::as_bool)
}

/// Length as the JavaScript client measures it (UTF-16 code units).
pub(crate) fn js_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_fields_all_present() {
        let input = record(json!({"a": "", "b": 0, "c": false}));
        assert!(validate_required_fields(&input, &["a", "b", "c"]).is_ok());
    }

    #[test]
    fn test_required_fields_names_every_missing_field() {
        let input = record(json!({"a": "x", "b": null}));
        let err = validate_required_fields(&input, &["a", "b", "c"]).unwrap_err();
        assert_eq!(err.error, "Missing required fields: b, c");
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_required_fields_does_not_name_present_fields() {
        let input = record(json!({"title": "x"}));
        let err = validate_required_fields(&input, &["title", "start", "end"]).unwrap_err();
        assert!(!err.error.contains("title"));
        assert!(err.error.contains("start"));
        assert!(err.error.contains("end"));
    }

    #[test]
    fn test_email_accepts_loose_addresses() {
        assert!(validate_email(&json!("a@b.co")).is_ok());
        assert!(validate_email(&json!("first.last+tag@sub.example.org")).is_ok());
        // Known limitation of the loose pattern.
        assert!(validate_email(&json!("a@b.c.")).is_ok());
    }

    #[test]
    fn test_email_rejects_malformed_addresses() {
        for bad in ["", "plain", "a@b", "a @b.co", "a@@b.co", "@b.co", "a@.co", "a@b."] {
            let err = validate_email(&json!(bad)).unwrap_err();
            assert_eq!(err.error, "Invalid email format", "input: {bad}");
        }
    }

    #[test]
    fn test_email_rejects_non_strings() {
        assert!(validate_email(&json!(42)).is_err());
        assert!(validate_email(&json!(null)).is_err());
        assert!(validate_email(&json!(["a@b.co"])).is_err());
    }

    #[test]
    fn test_id_accepts_positive_integers() {
        assert_eq!(validate_id(&json!(1)), Ok(1));
        assert_eq!(validate_id(&json!("42")), Ok(42));
        assert_eq!(validate_id(&json!("  7")), Ok(7));
    }

    #[test]
    fn test_id_truncates_like_parse_int() {
        assert_eq!(validate_id(&json!("5abc")), Ok(5));
        assert_eq!(validate_id(&json!("5.9")), Ok(5));
        assert_eq!(validate_id(&json!("3.7")), Ok(3));
        assert_eq!(validate_id(&json!(3.7)), Ok(3));
    }

    #[test]
    fn test_id_rejects_non_positive_and_non_numeric() {
        for bad in [json!(0), json!(-1), json!("0"), json!("-5"), json!("abc"), json!(""),
            json!("0x10"), json!(0.5), json!(true), json!(null), json!({})]
        {
            let err = validate_id(&bad).unwrap_err();
            assert_eq!(err.error, "Invalid ID format", "input: {bad}");
        }
    }

    #[test]
    fn test_id_param_matches_value_coercion() {
        assert_eq!(validate_id_param("12"), Ok(12));
        assert_eq!(validate_id_param("12.9"), Ok(12));
        assert!(validate_id_param("x12").is_err());
        assert!(validate_id_param("-12").is_err());
    }

    #[test]
    fn test_parse_int_prefix_saturates_on_overflow() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_optional_fields_tolerate_wrong_types() {
        let input = record(json!({"photo": 5, "flag": "yes", "name": "x"}));
        assert_eq!(optional_str(&input, "photo"), None);
        assert_eq!(optional_bool(&input, "flag"), None);
        assert_eq!(optional_str(&input, "name").as_deref(), Some("x"));
    }

    #[test]
    fn test_js_len_counts_utf16_units() {
        assert_eq!(js_len("abc"), 3);
        assert_eq!(js_len("🌱"), 2);
    }
}
