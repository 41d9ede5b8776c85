pub mod comment;
pub mod dates;
pub mod event;
pub mod fields;
pub mod image;
pub mod plant;
pub mod post;
pub mod user;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use comment::{ValidComment, validate_comment};
pub use dates::{DateRange, validate_date_range};
pub use event::{PartialEvent, ValidEvent, validate_event, validate_partial_event};
pub use fields::{validate_email, validate_id, validate_id_param, validate_required_fields};
pub use image::{ImageFile, validate_image};
pub use plant::{PartialPlant, ValidPlant, validate_partial_plant, validate_plant};
pub use post::{PartialPost, ValidPost, validate_partial_post, validate_post};
pub use user::{PartialUser, ValidUser, validate_partial_user, validate_user};

/// An untyped request body as received from the client.
pub type Record = Map<String, Value>;

/// Uniform failure shape returned by every validator.
///
/// Serializes as `{ "error": ..., "status": ... }`. The status is always 400
/// for validation failures; other codes belong to the route layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{error}")]
pub struct ValidationError {
    pub error: String,
    pub status: u16,
}

impl ValidationError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            status: StatusCode::BAD_REQUEST.as_u16(),
        }
    }
}

pub type Validation<T> = Result<T, ValidationError>;

/// Structural check for untyped JSON: an object carrying both `error` and
/// `status` keys is treated as a validation error.
///
/// None of the `Valid*` shapes in this module declare either key.
pub fn is_validation_error(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("error") && obj.contains_key("status"))
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Renders a validation error as `{ "error": ... }` with the error's status.
pub fn validation_error_response(err: &ValidationError) -> Response {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::BAD_REQUEST);
    let body = Json(ErrorBody {
        error: err.error.as_str(),
    });

    (status, body).into_response()
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        validation_error_response(&self)
    }
}
