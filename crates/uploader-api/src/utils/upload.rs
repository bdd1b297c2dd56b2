//! Common utilities for the upload handler

use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use uploader_core::AppError;

/// Name recorded when the client sends no usable filename
const UNKNOWN_FILENAME: &str = "unknown";

/// Extract file data and filename from multipart form.
/// Only one field named "file" is accepted; other fields are ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<(Bytes, String), AppError> {
    let mut file_data: Option<Bytes> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s: &str| s.to_string());

            let data = field.bytes().await.map_err(multipart_error)?;
            file_data = Some(data);
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if file_data.is_empty() {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }

    Ok((file_data, sanitize_filename(filename.as_deref())))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds request size limit: {}", err))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err))
    }
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size of {} bytes exceeds maximum allowed size of {} bytes",
            file_size, max_size
        )));
    }
    Ok(())
}

/// Last path component of a client filename, without control characters
pub fn sanitize_filename(filename: Option<&str>) -> String {
    let base = filename
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        UNKNOWN_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}
