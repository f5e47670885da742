use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::error::ApiError;

/// Largest accepted file part.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Room for the text fields that travel next to a file.
pub const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 64 * 1024;

fn is_image_type(value: &str) -> bool {
    lazy_static! {
        static ref IMAGE_TYPES_RE: Regex = Regex::new(r"jpeg|jpg|png|gif").unwrap();
    }
    IMAGE_TYPES_RE.is_match(value)
}

/// Both the declared content type and the filename extension must name an
/// accepted image type.
pub fn check_image_type(content_type: Option<&str>, file_name: Option<&str>) -> Result<(), ApiError> {
    let mime_ok = content_type.map(is_image_type).unwrap_or(false);
    let ext = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if mime_ok && is_image_type(&ext) {
        Ok(())
    } else {
        warn!(?content_type, ?file_name, "upload rejected by type filter");
        Err(ApiError::Rejected("Error: Images only!".into()))
    }
}

/// Reads a file part through the type filter and the size cap. The cap is
/// checked per chunk so an oversized part is never fully buffered.
pub async fn read_image_field(mut field: Field<'_>) -> Result<Bytes, ApiError> {
    check_image_type(field.content_type(), field.file_name())?;

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
            warn!(limit = MAX_UPLOAD_BYTES, "upload rejected by size cap");
            return Err(ApiError::TooLarge("File too large"));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

pub fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge("File too large")
    } else {
        ApiError::Rejected(e.body_text())
    }
}
