use crate::traits::{MediaHost, MediaHostError, MediaHostResult, UploadedImage};
use crate::MediaHostBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem media host
///
/// Objects are written to `{base_path}/{public_id}` and served by the API under
/// `base_url`.
#[derive(Clone, Debug)]
pub struct LocalMediaHost {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaHost {
    /// Create a new LocalMediaHost instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored objects (e.g., "./media")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:5200/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> MediaHostResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            MediaHostError::ConfigError(format!(
                "Failed to create media directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalMediaHost {
            base_path,
            base_url,
        })
    }

    /// Convert a public id to a filesystem path below the base directory
    fn id_to_path(&self, public_id: &str) -> MediaHostResult<PathBuf> {
        if public_id.is_empty()
            || public_id.contains("..")
            || public_id.starts_with('/')
            || public_id.contains('\\')
        {
            return Err(MediaHostError::InvalidId(public_id.to_string()));
        }

        let path = self.base_path.join(public_id);

        if let (Ok(base), Ok(canonical)) = (self.base_path.canonicalize(), path.canonicalize()) {
            if canonical.strip_prefix(&base).is_err() {
                return Err(MediaHostError::InvalidId(public_id.to_string()));
            }
        }

        Ok(path)
    }

    /// New public id: `{folder}/{uuid}` keeping the original extension
    fn generate_id(filename: &str, folder: &str) -> String {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            format!("{}{}", Uuid::new_v4(), extension)
        } else {
            format!("{}/{}{}", folder, Uuid::new_v4(), extension)
        }
    }

    fn generate_url(&self, public_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), public_id)
    }
}

#[async_trait]
impl MediaHost for LocalMediaHost {
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
    ) -> MediaHostResult<UploadedImage> {
        let public_id = Self::generate_id(filename, folder);
        let path = self
            .id_to_path(&public_id)
            .map_err(|e| MediaHostError::Upload(e.to_string()))?;
        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                MediaHostError::Upload(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = fs::File::create(&path).await.map_err(|e| {
            MediaHostError::Upload(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            MediaHostError::Upload(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            MediaHostError::Upload(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            public_id = %public_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local media upload successful"
        );

        Ok(UploadedImage {
            url: self.generate_url(&public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> MediaHostResult<()> {
        let path = self.id_to_path(public_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            MediaHostError::Delete(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), public_id = %public_id, "Local media delete successful");
        Ok(())
    }

    fn backend_type(&self) -> MediaHostBackend {
        MediaHostBackend::Local
    }
}
