//! Route configuration and setup

use crate::api_doc::openapi_spec;
use crate::constants::{
    DEFAULT_HTTP_CONCURRENCY_LIMIT, MEDIA_MOUNT_PATH, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH,
};
use crate::handlers;
use crate::state::{AppState, MediaState};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uploader_core::{Config, MediaHostBackend};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let create_route = match &state.media {
        MediaState::Hosted(_) => post(handlers::image_upload::upload_image),
        MediaState::Direct => post(handlers::image_create::create_image),
    };

    let spec = openapi_spec(state.media.shape());

    let mut app = Router::new()
        .route(
            "/",
            get(handlers::image_get::list_images).merge(create_route),
        )
        .route(
            "/{id}",
            get(handlers::image_get::get_image)
                .put(handlers::image_update::update_image)
                .delete(handlers::image_delete::delete_image),
        )
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route(
            OPENAPI_PATH,
            get(move || {
                let spec = spec.clone();
                async move { Json(spec) }
            }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"));

    if config.uses_media_host() && config.media_host_backend == MediaHostBackend::Local {
        tracing::info!(
            path = %config.local_media_path,
            mount = MEDIA_MOUNT_PATH,
            "Serving local media files"
        );
        app = app.nest_service(MEDIA_MOUNT_PATH, ServeDir::new(&config.local_media_path));
    }

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);

    let body_limit = config
        .max_file_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        body_limit_bytes = body_limit,
        "Request limits configured"
    );

    let app = app
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
