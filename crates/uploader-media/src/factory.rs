#[cfg(feature = "media-cloudinary")]
use crate::CloudinaryHost;
#[cfg(feature = "media-local")]
use crate::LocalMediaHost;
use crate::{MediaHost, MediaHostBackend, MediaHostError, MediaHostResult};
use std::sync::Arc;
use uploader_core::Config;

/// Create a media host based on configuration
pub async fn create_media_host(config: &Config) -> MediaHostResult<Arc<dyn MediaHost>> {
    match config.media_host_backend {
        #[cfg(feature = "media-cloudinary")]
        MediaHostBackend::Cloudinary => {
            let credentials = config.cloudinary.clone().ok_or_else(|| {
                MediaHostError::ConfigError(
                    "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set"
                        .to_string(),
                )
            })?;

            let host = CloudinaryHost::new(credentials, config.cloudinary_api_base_url.clone())?;
            Ok(Arc::new(host))
        }

        #[cfg(not(feature = "media-cloudinary"))]
        MediaHostBackend::Cloudinary => Err(MediaHostError::ConfigError(
            "Cloudinary media host not available (media-cloudinary feature not enabled)".to_string(),
        )),

        #[cfg(feature = "media-local")]
        MediaHostBackend::Local => {
            let host = LocalMediaHost::new(
                config.local_media_path.clone(),
                config.local_media_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(host))
        }

        #[cfg(not(feature = "media-local"))]
        MediaHostBackend::Local => Err(MediaHostError::ConfigError(
            "Local media host not available (media-local feature not enabled)".to_string(),
        )),
    }
}
