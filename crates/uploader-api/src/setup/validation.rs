//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use uploader_core::{Config, MediaHostBackend, StoreBackend};

/// Validate critical configuration values
///
/// # Returns
/// Ok(()) if validation passes, Err with details if validation fails
pub fn validate_config(config: &Config) -> Result<()> {
    let is_production = config.is_production();

    if is_production && config.cors_origins.iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.store_backend == StoreBackend::Mongo && config.mongodb_uri.is_none() {
        return Err(anyhow::anyhow!(
            "MONGODB_URI must be set when STORE_BACKEND is mongo"
        ));
    }

    if is_production && config.store_backend == StoreBackend::Memory {
        tracing::warn!("In-memory record store in production - records are lost on restart");
    }

    if config.collection_name.is_empty() || config.collection_name.contains('$') {
        return Err(anyhow::anyhow!(
            "COLLECTION_NAME must be non-empty and must not contain '$'"
        ));
    }

    if config.uses_media_host() {
        if config.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB cannot be 0"));
        }

        if config.media_host_backend == MediaHostBackend::Cloudinary
            && config.cloudinary.is_none()
        {
            return Err(anyhow::anyhow!(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set \
                for hosted records on Cloudinary"
            ));
        }
    }

    if !matches!(config.log_format.as_str(), "compact" | "json") {
        tracing::warn!(
            log_format = %config.log_format,
            "Unknown LOG_FORMAT, falling back to compact"
        );
    }

    Ok(())
}
