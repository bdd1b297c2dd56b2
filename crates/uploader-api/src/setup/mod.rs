//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod media;
pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use uploader_core::Config;

/// Initialize the entire application
///
/// The store is connected and its schema guard applied before any route exists;
/// a failure here aborts startup.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first so validation warnings are visible
    crate::telemetry::init_telemetry(&config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Validate configuration - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        shape = %config.record_shape,
        store = %config.store_backend,
        "Configuration loaded and validated successfully"
    );

    // Setup record store (connects and applies the schema guard)
    let store = database::setup_record_store(&config).await?;

    // Setup media host for hosted records
    let media = media::setup_media(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), store, media));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
