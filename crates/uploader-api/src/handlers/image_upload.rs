use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ImageMutationResponse;
use crate::services::image_lifecycle::ImageLifecycleService;
use crate::state::{AppState, MediaState};
use crate::utils::upload::extract_multipart_file;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uploader_core::AppError;

/// Upload image handler for hosted records
///
/// Sends the `file` field to the media host and records the returned public id
/// and URL under the original filename.
///
/// # Errors
/// - `AppError::BadRequest` - No file or an empty file
/// - `AppError::PayloadTooLarge` - File exceeds size limit
/// - `AppError::MediaHost` - Media host upload failure
/// - `AppError::Database` - Record insert failure
#[utoipa::path(
    post,
    path = "/",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 201, description = "Image uploaded", body = ImageMutationResponse),
        (status = 400, description = "No file provided", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Upload or insert failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let MediaState::Hosted(media) = &state.media else {
        return Err(AppError::Internal("Uploads require a media host".to_string()).into());
    };

    let (data, filename) = extract_multipart_file(multipart).await?;

    let service = ImageLifecycleService::new(state.store.clone(), media.clone());
    let id = service.create(data, &filename).await?.to_hex();

    Ok((
        StatusCode::CREATED,
        Json(ImageMutationResponse {
            message: "File uploaded and saved to database successfully".to_string(),
            id,
        }),
    ))
}
