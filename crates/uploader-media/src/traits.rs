//! Media host abstraction trait
//!
//! This module defines the MediaHost trait that all media host backends must implement.

use crate::MediaHostBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Media host operation errors
#[derive(Debug, Error)]
pub enum MediaHostError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Invalid public id: {0}")]
    InvalidId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media host operations
pub type MediaHostResult<T> = Result<T, MediaHostError>;

/// Object stored on a media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Host-assigned identifier, needed to delete the object later
    pub public_id: String,
    /// Publicly reachable URL
    pub url: String,
}

/// Media host abstraction trait
///
/// Hosted records reference exactly one object on the media host. The host is
/// the only owner of the bytes; the record store keeps `public_id` and `url`.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store `data` under `folder` and return where it landed
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
    ) -> MediaHostResult<UploadedImage>;

    /// Remove the object named `public_id`
    ///
    /// Deleting an object that is already gone succeeds.
    async fn delete(&self, public_id: &str) -> MediaHostResult<()>;

    /// Get the media host backend type
    fn backend_type(&self) -> MediaHostBackend;
}
