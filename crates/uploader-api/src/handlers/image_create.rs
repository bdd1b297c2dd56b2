use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::ImageMutationResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{Map, Value};
use std::sync::Arc;
use uploader_core::AppError;

/// Create image handler for direct records
///
/// The body is stored as sent; the record store rejects anything that is not
/// exactly `{ name, url }` with non-empty strings.
#[utoipa::path(
    post,
    path = "/",
    tag = "images",
    request_body(content = inline(Object), content_type = "application/json", description = "`{ \"name\": string, \"url\": string }`"),
    responses(
        (status = 201, description = "Image created", body = ImageMutationResponse),
        (status = 400, description = "Invalid body or schema violation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(operation = "create_image"))]
pub async fn create_image(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Map<String, Value>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let fields = bson::to_document(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))?;

    let id = state.store.insert(fields).await?.to_hex();

    tracing::info!(image_id = %id, "Image created");

    Ok((
        StatusCode::CREATED,
        Json(ImageMutationResponse {
            message: format!("Created a new image: ID {}.", id),
            id,
        }),
    ))
}
