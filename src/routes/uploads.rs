use axum::{Json, Router, extract::Multipart, routing::post};

use crate::errors::AppError;
use crate::logging::{RecordKind, ValidationEvent};
use crate::models::{self, ImageFile};

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

pub fn router() -> Router {
    Router::new().route("/images/validate", post(validate_image))
}

#[tracing::instrument(name = "validate_image_upload", skip(multipart), fields(size, content_type))]
pub async fn validate_image(mut multipart: Multipart) -> Result<Json<ImageFile>, AppError> {
    let file = read_file_field(&mut multipart).await?;

    if let Some(file) = &file {
        let span = tracing::Span::current();
        span.record("size", file.size);
        if let Some(content_type) = &file.content_type {
            span.record("content_type", content_type.as_str());
        }
    }

    match models::validate_image(file) {
        Ok(image) => {
            crate::log_validation_event!(
                ValidationEvent::Accepted,
                RecordKind::Image,
                "Image accepted"
            );
            Ok(Json(image))
        }
        Err(err) => {
            crate::log_validation_event!(
                ValidationEvent::Rejected,
                RecordKind::Image,
                reason = %err,
                "Image rejected"
            );
            Err(err.into())
        }
    }
}

/// Reads the first field named `file`; other fields are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<ImageFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Multipart(err.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::Multipart(err.to_string()))?;

        return Ok(Some(ImageFile::new(file_name, content_type, data)));
    }

    Ok(None)
}
