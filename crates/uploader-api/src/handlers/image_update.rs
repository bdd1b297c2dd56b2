use crate::error::{not_found_message, ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::ImageMutationResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use uploader_core::AppError;
use uploader_db::UpdateOutcome;

/// Merge fields into an image record
///
/// Keys may be dotted paths (`image.url`). The merged record must still match
/// the record shape.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "images",
    params(
        ("id" = String, Path, description = "Image ID (24-character hex)")
    ),
    request_body(content = inline(Object), content_type = "application/json", description = "Fields to merge"),
    responses(
        (status = 200, description = "Image updated", body = ImageMutationResponse),
        (status = 304, description = "Image matched but nothing changed"),
        (status = 400, description = "Malformed ID or schema violation", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(image_id = %id, operation = "update_image"))]
pub async fn update_image(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Map<String, Value>>,
) -> Result<Response, HttpAppError> {
    let partial = bson::to_document(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))?;

    match state.store.update(&id, partial).await? {
        UpdateOutcome::Modified => Ok((
            StatusCode::OK,
            Json(ImageMutationResponse {
                message: format!("Updated an image: ID {}.", id),
                id,
            }),
        )
            .into_response()),
        UpdateOutcome::Unchanged => Ok(StatusCode::NOT_MODIFIED.into_response()),
        UpdateOutcome::NotMatched => Err(AppError::NotFound(not_found_message(&id)).into()),
    }
}
