use axum::{
    Extension, Json, Router,
    extract::Path,
    routing::{get, post},
};
use serde::Serialize;

use crate::clock::SharedClock;
use crate::errors::AppError;
use crate::extract::JsonRecord;
use crate::logging::{RecordKind, SanitizedEmail, SanitizedUsername, ValidationEvent};
use crate::models::{
    self, PartialEvent, PartialPlant, PartialPost, PartialUser, Validation, ValidComment,
    ValidEvent, ValidPlant, ValidPost, ValidationError,
};

pub fn router() -> Router {
    Router::new()
        .route(
            "/events/validate",
            post(validate_event).patch(validate_event_update),
        )
        .route(
            "/plants/validate",
            post(validate_plant).patch(validate_plant_update),
        )
        .route(
            "/users/validate",
            post(validate_user).patch(validate_user_update),
        )
        .route(
            "/posts/validate",
            post(validate_post).patch(validate_post_update),
        )
        .route("/comments/validate", post(validate_comment))
        .route("/ids/:id", get(validate_id))
}

/// Logs the outcome and converts a rejection into the handler error.
fn checked<T>(kind: RecordKind, result: Validation<T>) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            crate::log_validation_event!(ValidationEvent::Accepted, kind, "Record accepted");
            Ok(value)
        }
        Err(err) => {
            crate::log_validation_event!(
                ValidationEvent::Rejected,
                kind,
                reason = %err,
                "Record rejected"
            );
            Err(err.into())
        }
    }
}

/// An update that names no known field has nothing to apply.
fn non_empty_update<T>(kind: RecordKind, update: T, is_empty: bool) -> Result<T, AppError> {
    if is_empty {
        return checked(
            kind,
            Err(ValidationError::bad_request("No valid fields to update")),
        );
    }
    Ok(update)
}

pub async fn validate_event(
    Extension(clock): Extension<SharedClock>,
    JsonRecord(record): JsonRecord,
) -> Result<Json<ValidEvent>, AppError> {
    let event = checked(
        RecordKind::Event,
        models::validate_event(&record, clock.as_ref()),
    )?;
    Ok(Json(event))
}

pub async fn validate_event_update(
    Extension(clock): Extension<SharedClock>,
    JsonRecord(record): JsonRecord,
) -> Result<Json<PartialEvent>, AppError> {
    let update = checked(
        RecordKind::Event,
        models::validate_partial_event(&record, clock.as_ref()),
    )?;
    let is_empty = update.is_empty();
    Ok(Json(non_empty_update(RecordKind::Event, update, is_empty)?))
}

pub async fn validate_plant(
    JsonRecord(record): JsonRecord,
) -> Result<Json<ValidPlant>, AppError> {
    let plant = checked(RecordKind::Plant, models::validate_plant(&record))?;
    Ok(Json(plant))
}

pub async fn validate_plant_update(
    JsonRecord(record): JsonRecord,
) -> Result<Json<PartialPlant>, AppError> {
    let update = checked(RecordKind::Plant, models::validate_partial_plant(&record))?;
    let is_empty = update.is_empty();
    Ok(Json(non_empty_update(RecordKind::Plant, update, is_empty)?))
}

#[derive(Debug, Serialize)]
pub struct UserCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    password_set: bool,
}

#[tracing::instrument(name = "validate_user", skip(record), fields(username, email))]
pub async fn validate_user(JsonRecord(record): JsonRecord) -> Result<Json<UserCheck>, AppError> {
    record_identity(
        record.get("username").and_then(|v| v.as_str()),
        record.get("email").and_then(|v| v.as_str()),
    );

    let user = checked(RecordKind::User, models::validate_user(&record))?;

    Ok(Json(UserCheck {
        username: Some(user.username),
        email: Some(user.email),
        password_set: true,
    }))
}

#[tracing::instrument(name = "validate_user_update", skip(record), fields(username, email))]
pub async fn validate_user_update(
    JsonRecord(record): JsonRecord,
) -> Result<Json<UserCheck>, AppError> {
    record_identity(
        record.get("username").and_then(|v| v.as_str()),
        record.get("email").and_then(|v| v.as_str()),
    );

    let update: PartialUser = checked(RecordKind::User, models::validate_partial_user(&record))?;
    let is_empty = update.is_empty();
    let update = non_empty_update(RecordKind::User, update, is_empty)?;

    Ok(Json(UserCheck {
        password_set: update.password.is_some(),
        username: update.username,
        email: update.email,
    }))
}

/// Records masked identity fields on the current span.
fn record_identity(username: Option<&str>, email: Option<&str>) {
    let span = tracing::Span::current();
    if let Some(username) = username {
        span.record(
            "username",
            tracing::field::display(SanitizedUsername::new(username)),
        );
    }
    if let Some(email) = email {
        span.record("email", tracing::field::display(SanitizedEmail::new(email)));
    }
}

pub async fn validate_post(JsonRecord(record): JsonRecord) -> Result<Json<ValidPost>, AppError> {
    let post = checked(RecordKind::Post, models::validate_post(&record))?;
    Ok(Json(post))
}

pub async fn validate_post_update(
    JsonRecord(record): JsonRecord,
) -> Result<Json<PartialPost>, AppError> {
    let update = checked(RecordKind::Post, models::validate_partial_post(&record))?;
    let is_empty = update.is_empty();
    Ok(Json(non_empty_update(RecordKind::Post, update, is_empty)?))
}

pub async fn validate_comment(
    JsonRecord(record): JsonRecord,
) -> Result<Json<ValidComment>, AppError> {
    let comment = checked(RecordKind::Comment, models::validate_comment(&record))?;
    Ok(Json(comment))
}

#[derive(Debug, Serialize)]
pub struct IdCheck {
    id: i64,
}

pub async fn validate_id(Path(raw): Path<String>) -> Result<Json<IdCheck>, AppError> {
    let id = checked(RecordKind::Id, models::validate_id_param(&raw))?;
    Ok(Json(IdCheck { id }))
}
