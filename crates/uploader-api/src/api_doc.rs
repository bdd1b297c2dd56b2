//! OpenAPI documentation.
//!
//! `POST /` depends on the record shape, so the served document is assembled
//! per shape by [`openapi_spec`].

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use uploader_core::models;
use uploader_core::RecordShape;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Simple Image Uploader API",
        version = "0.1.0",
        description = "CRUD API for image records. With RECORD_SHAPE=hosted, `POST /` accepts a multipart upload stored on the media host; with RECORD_SHAPE=direct it accepts a JSON body with a client-supplied URL."
    ),
    paths(
        handlers::image_get::list_images,
        handlers::image_get::get_image,
        handlers::image_update::update_image,
        handlers::image_delete::delete_image,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::ImageResponse,
        models::ImageSource,
        models::HostedImage,
        handlers::ImageMutationResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "images", description = "Image records"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(paths(handlers::image_upload::upload_image))]
struct HostedCreateDoc;

#[derive(OpenApi)]
#[openapi(paths(handlers::image_create::create_image))]
struct DirectCreateDoc;

/// OpenAPI document for the configured record shape
pub fn openapi_spec(shape: RecordShape) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    match shape {
        RecordShape::Hosted => spec.merge(HostedCreateDoc::openapi()),
        RecordShape::Direct => spec.merge(DirectCreateDoc::openapi()),
    }
    spec
}
