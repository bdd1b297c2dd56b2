pub mod health;
pub mod image_create;
pub mod image_delete;
pub mod image_get;
pub mod image_update;
pub mod image_upload;

use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement returned by write operations
#[derive(Debug, Serialize, ToSchema)]
pub struct ImageMutationResponse {
    pub message: String,
    /// Hex-encoded record identifier
    pub id: String,
}
