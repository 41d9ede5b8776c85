use serde::Serialize;
use serde_json::Value;

use super::fields::{field, js_len, validate_email, validate_required_fields};
use super::{Record, Validation, ValidationError};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MIN_PASSWORD_LENGTH: usize = 8;

const REQUIRED_FIELDS: &[&str] = &["username", "email", "password"];

/// A sign-up payload that passed validation. The password is still plain
/// text and is skipped when serializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidUser {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl PartialUser {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn validate_user(record: &Record) -> Validation<ValidUser> {
    validate_required_fields(record, REQUIRED_FIELDS)?;

    Ok(ValidUser {
        username: username(field(record, "username"))?,
        email: email(field(record, "email"))?,
        password: password(field(record, "password"))?,
    })
}

pub fn validate_partial_user(record: &Record) -> Validation<PartialUser> {
    let mut update = PartialUser::default();

    if let Some(value) = record.get("username") {
        update.username = Some(username(value)?);
    }
    if let Some(value) = record.get("email") {
        update.email = Some(email(value)?);
    }
    if let Some(value) = record.get("password") {
        update.password = Some(password(value)?);
    }

    Ok(update)
}

fn username(value: &Value) -> Validation<String> {
    let name = value
        .as_str()
        .ok_or_else(|| ValidationError::bad_request("Username must be a string"))?;

    let len = js_len(name);
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::bad_request(
            "Username must be between 3 and 30 characters",
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::bad_request(
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(name.to_owned())
}

fn email(value: &Value) -> Validation<String> {
    validate_email(value)?;
    Ok(value.as_str().unwrap_or_default().to_owned())
}

/// At least eight characters with an uppercase letter, a lowercase letter and
/// a digit. Symbols are allowed but not required.
fn password(value: &Value) -> Validation<String> {
    let password = value
        .as_str()
        .ok_or_else(|| ValidationError::bad_request("Password must be a string"))?;

    if js_len(password) < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::bad_request(
            "Password must be at least 8 characters long",
        ));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(password.to_owned())
    } else {
        Err(ValidationError::bad_request(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn valid_input() -> Record {
        record(json!({
            "username": "green_thumb",
            "email": "gardener@example.com",
            "password": "Abcdefg1",
        }))
    }

    #[test]
    fn test_valid_user() {
        let user = validate_user(&valid_input()).unwrap();
        assert_eq!(user.username, "green_thumb");
        assert_eq!(user.email, "gardener@example.com");
        assert_eq!(user.password, "Abcdefg1");
    }

    #[test]
    fn test_short_username_mentions_username() {
        let err = validate_user(&record(json!({
            "username": "ab",
            "email": "a@b.co",
            "password": "Abcdefg1",
        })))
        .unwrap_err();
        assert!(err.error.to_lowercase().contains("username"));
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_username_length_bounds() {
        let mut input = valid_input();
        input.insert("username".into(), json!("abc"));
        assert!(validate_user(&input).is_ok());

        input.insert("username".into(), json!("a".repeat(MAX_USERNAME_LENGTH)));
        assert!(validate_user(&input).is_ok());

        input.insert("username".into(), json!("a".repeat(MAX_USERNAME_LENGTH + 1)));
        let err = validate_user(&input).unwrap_err();
        assert_eq!(err.error, "Username must be between 3 and 30 characters");
    }

    #[test]
    fn test_username_charset() {
        let mut input = valid_input();
        for bad in ["with space", "dash-name", "dots.are.bad", "émile"] {
            input.insert("username".into(), json!(bad));
            let err = validate_user(&input).unwrap_err();
            assert_eq!(
                err.error,
                "Username can only contain letters, numbers, and underscores",
                "input: {bad}"
            );
        }
    }

    #[test]
    fn test_username_checked_before_email() {
        let err = validate_user(&record(json!({
            "username": "x",
            "email": "nope",
            "password": "weak",
        })))
        .unwrap_err();
        assert_eq!(err.error, "Username must be between 3 and 30 characters");
    }

    #[test]
    fn test_invalid_email() {
        let mut input = valid_input();
        input.insert("email".into(), json!("gardener.example.com"));
        assert_eq!(validate_user(&input).unwrap_err().error, "Invalid email format");
    }

    #[test]
    fn test_password_rules() {
        let mut input = valid_input();

        input.insert("password".into(), json!("Abc1"));
        assert_eq!(
            validate_user(&input).unwrap_err().error,
            "Password must be at least 8 characters long"
        );

        for weak in ["abcdefg1", "ABCDEFG1", "Abcdefgh"] {
            input.insert("password".into(), json!(weak));
            assert_eq!(
                validate_user(&input).unwrap_err().error,
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
                "input: {weak}"
            );
        }

        input.insert("password".into(), json!(12345678));
        assert_eq!(validate_user(&input).unwrap_err().error, "Password must be a string");
    }

    #[test]
    fn test_password_is_not_serialized() {
        let value = serde_json::to_value(validate_user(&valid_input()).unwrap()).unwrap();
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_full_user_fields_pass_partial_individually() {
        let input = valid_input();
        assert!(validate_user(&input).is_ok());

        for (key, value) in &input {
            let mut single = Record::new();
            single.insert(key.clone(), value.clone());
            let update = validate_partial_user(&single).unwrap();
            assert!(!update.is_empty(), "field: {key}");
        }
    }

    #[test]
    fn test_partial_user_applies_password_strength() {
        let err = validate_partial_user(&record(json!({"password": "lowercase1"}))).unwrap_err();
        assert!(err.error.contains("uppercase"));
    }

    #[test]
    fn test_partial_user_empty() {
        let update = validate_partial_user(&record(json!({"bio": "hi", "avatar": null}))).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_partial_user_rejects_explicit_null() {
        let err = validate_partial_user(&record(json!({"username": null}))).unwrap_err();
        assert_eq!(err.error, "Username must be a string");

        let err = validate_partial_user(&record(json!({"email": null}))).unwrap_err();
        assert_eq!(err.error, "Invalid email format");

        let err = validate_partial_user(&record(json!({"password": null}))).unwrap_err();
        assert_eq!(err.error, "Password must be a string");
    }
}
