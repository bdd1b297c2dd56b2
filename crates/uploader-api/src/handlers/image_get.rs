use crate::error::{not_found_message, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uploader_core::models::ImageResponse;
use uploader_core::AppError;
use uploader_db::StoreError;

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "images",
    params(
        ("id" = String, Path, description = "Image ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Image found", body = ImageResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "get_image"))]
pub async fn get_image(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.store.find_by_id(&id).await.map_err(|e| match e {
        // A malformed id cannot name a record.
        StoreError::InvalidId(_) => HttpAppError(AppError::NotFound(not_found_message(&id))),
        other => other.into(),
    })?;

    Ok(Json(ImageResponse::from(record)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "images",
    responses(
        (status = 200, description = "List of images", body = Vec<ImageResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.store.list_all().await?;

    let responses: Vec<ImageResponse> = records.into_iter().map(ImageResponse::from).collect();

    Ok(Json(responses))
}
