//! Hosted image lifecycle
//!
//! A hosted record and its media host object are created and removed together:
//!
//! - create uploads first and inserts second; when the insert fails the uploaded
//!   object is deleted in the background so no orphan is left behind.
//! - delete removes the media host object first and the record second; when the
//!   media host delete fails the record is kept and the error is returned.

use std::sync::Arc;

use bson::oid::ObjectId;
use bytes::Bytes;
use uploader_core::models::NewImage;
use uploader_core::AppError;
use uploader_db::RecordStore;
use uploader_media::MediaHost;

use crate::error::HttpAppError;
use crate::state::HostedMedia;
use crate::utils::upload::validate_file_size;

pub struct ImageLifecycleService {
    store: Arc<dyn RecordStore>,
    media: HostedMedia,
}

impl ImageLifecycleService {
    pub fn new(store: Arc<dyn RecordStore>, media: HostedMedia) -> Self {
        Self { store, media }
    }

    fn host(&self) -> &Arc<dyn MediaHost> {
        &self.media.host
    }

    /// Upload `data` and record it under `name`
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn create(&self, data: Bytes, name: &str) -> Result<ObjectId, HttpAppError> {
        validate_file_size(data.len(), self.media.max_file_size)?;

        let uploaded = self.host().upload(data, name, &self.media.folder).await?;
        let record = NewImage::hosted(name, uploaded.public_id.clone(), uploaded.url);

        match self.store.insert(record.to_document()).await {
            Ok(id) => {
                tracing::info!(image_id = %id, public_id = %uploaded.public_id, "Image created");
                Ok(id)
            }
            Err(e) => {
                let host = self.host().clone();
                let public_id = uploaded.public_id;
                tokio::spawn(async move {
                    if let Err(cleanup_err) = host.delete(&public_id).await {
                        tracing::warn!(
                            error = %cleanup_err,
                            public_id = %public_id,
                            "Failed to cleanup media host object after store error"
                        );
                    }
                });
                Err(e.into())
            }
        }
    }

    /// Remove the media host object, then the record
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), HttpAppError> {
        let record = self.store.find_by_id(id).await?;

        let public_id = record.public_id().ok_or_else(|| {
            AppError::Internal(format!("Record {} has no media host reference", id))
        })?;

        self.host().delete(public_id).await?;

        if !self.store.delete_by_id(id).await? {
            return Err(AppError::BadRequest(format!("Failed to remove an image: ID {}", id)).into());
        }

        tracing::info!(image_id = %id, public_id = %public_id, "Image deleted");
        Ok(())
    }
}
