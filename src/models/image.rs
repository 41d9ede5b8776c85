use axum::body::Bytes;
use serde::Serialize;

use super::{Validation, ValidationError};

pub const MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size: u64,
    #[serde(skip)]
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(file_name: Option<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            file_name,
            content_type,
            size: data.len() as u64,
            data,
        }
    }
}

/// Hands the same file back when it is an allowed image no larger than 5 MiB.
pub fn validate_image(file: Option<ImageFile>) -> Validation<ImageFile> {
    let file = file.ok_or_else(|| ValidationError::bad_request("No file provided"))?;

    let allowed = file
        .content_type
        .as_deref()
        .is_some_and(|mime| ALLOWED_IMAGE_TYPES.contains(&mime));
    if !allowed {
        return Err(ValidationError::bad_request(
            "Only JPEG, PNG, WebP and GIF images are allowed",
        ));
    }

    if file.size > MAX_IMAGE_SIZE_BYTES {
        return Err(ValidationError::bad_request("File size must be less than 5MB"));
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: Option<&str>, size: u64) -> ImageFile {
        ImageFile {
            file_name: Some("leaf.png".to_string()),
            content_type: content_type.map(str::to_owned),
            size,
            data: Bytes::new(),
        }
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(validate_image(None).unwrap_err().error, "No file provided");
    }

    #[test]
    fn test_allowed_types_accepted() {
        for mime in ALLOWED_IMAGE_TYPES {
            assert!(validate_image(Some(file(Some(*mime), 1024))).is_ok(), "type: {mime}");
        }
    }

    #[test]
    fn test_other_types_rejected() {
        for mime in [Some("application/pdf"), Some("image/svg+xml"), Some("IMAGE/PNG"), Some(""), None] {
            let err = validate_image(Some(file(mime, 1024))).unwrap_err();
            assert!(err.error.to_lowercase().contains("allowed"), "type: {mime:?}");
            assert_eq!(err.status, 400);
        }
    }

    #[test]
    fn test_size_boundary() {
        assert!(validate_image(Some(file(Some("image/jpeg"), MAX_IMAGE_SIZE_BYTES))).is_ok());

        let err = validate_image(Some(file(Some("image/jpeg"), MAX_IMAGE_SIZE_BYTES + 1))).unwrap_err();
        assert_eq!(err.error, "File size must be less than 5MB");
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = validate_image(Some(file(Some("text/plain"), MAX_IMAGE_SIZE_BYTES * 2))).unwrap_err();
        assert!(err.error.contains("allowed"));
    }

    #[test]
    fn test_returns_same_file() {
        let original = ImageFile::new(
            Some("fern.gif".to_string()),
            Some("image/gif".to_string()),
            Bytes::from_static(b"GIF89a"),
        );
        let validated = validate_image(Some(original.clone())).unwrap();
        assert_eq!(validated, original);
        assert_eq!(validated.size, 6);
    }
}
