use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ImageMutationResponse;
use crate::services::image_lifecycle::ImageLifecycleService;
use crate::state::{AppState, MediaState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uploader_core::AppError;

/// Delete an image record
///
/// Hosted records lose their media host object first; if that fails the
/// record is kept and the error is returned.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "images",
    params(
        ("id" = String, Path, description = "Image ID (24-character hex)")
    ),
    responses(
        (status = 202, description = "Image removed", body = ImageMutationResponse),
        (status = 400, description = "Malformed ID or nothing removed", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Media host delete failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "delete_image"))]
pub async fn delete_image(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    match &state.media {
        MediaState::Hosted(media) => {
            ImageLifecycleService::new(state.store.clone(), media.clone())
                .delete(&id)
                .await?;
        }
        MediaState::Direct => {
            if !state.store.delete_by_id(&id).await? {
                return Err(
                    AppError::BadRequest(format!("Failed to remove an image: ID {}", id)).into(),
                );
            }
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(ImageMutationResponse {
            message: format!("Removed an image: ID {}", id),
            id,
        }),
    ))
}
