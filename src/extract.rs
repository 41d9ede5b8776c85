use axum::{
    async_trait,
    body::to_bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use serde_json::Deserializer;

use crate::errors::AppError;
use crate::models::Record;

pub const MAX_JSON_BODY_BYTES: usize = 64 * 1024; // 64 KiB upper bound for JSON bodies

/// A request body parsed as an untyped JSON object, ready for the validators.
#[derive(Debug)]
pub struct JsonRecord(pub Record);

#[async_trait]
impl<S> FromRequest<S> for JsonRecord
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        validate_content_type(req.headers())?;

        let body_bytes = to_bytes(req.into_body(), MAX_JSON_BODY_BYTES)
            .await
            .map_err(|err| AppError::BodyRead(err.to_string()))?;

        let mut deserializer = Deserializer::from_slice(body_bytes.as_ref());
        let record: Record = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(parsing_error)?;

        deserializer
            .end()
            .map_err(|err| AppError::InvalidJson(format!("unexpected trailing data: {err}")))?;

        Ok(JsonRecord(record))
    }
}

fn parsing_error(err: serde_path_to_error::Error<serde_json::Error>) -> AppError {
    let path = err.path().to_string();
    let error = err.into_inner();
    if path.is_empty() || path == "." {
        AppError::InvalidJson(error.to_string())
    } else {
        AppError::InvalidJson(format!("at {path}: {error}"))
    }
}

fn validate_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let value = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

    if let Some(value) = value
        && (value.starts_with("application/json") || value.ends_with("+json"))
    {
        return Ok(());
    }

    Err(AppError::UnsupportedMediaType(format!(
        "expected application/json, received {}",
        value.unwrap_or("missing")
    )))
}
