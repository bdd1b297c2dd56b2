//! Media host setup

use crate::state::{HostedMedia, MediaState};
use anyhow::{Context, Result};
use uploader_core::Config;
use uploader_media::create_media_host;

/// Create the media host when the record shape needs one
pub async fn setup_media(config: &Config) -> Result<MediaState> {
    if !config.uses_media_host() {
        tracing::info!("Direct records, no media host configured");
        return Ok(MediaState::Direct);
    }

    let host = create_media_host(config)
        .await
        .context("Failed to initialize media host")?;

    tracing::info!(
        backend = %host.backend_type(),
        folder = %config.upload_folder,
        "Media host initialized"
    );

    Ok(MediaState::Hosted(HostedMedia {
        host,
        folder: config.upload_folder.clone(),
        max_file_size: config.max_file_size_bytes,
    }))
}
