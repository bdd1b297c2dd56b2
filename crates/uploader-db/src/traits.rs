//! Record store abstraction trait
//!
//! This module defines the RecordStore trait that all store backends must implement.

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use thiserror::Error;
use uploader_core::models::ImageRecord;
use uploader_core::schema::ID_FIELD;
use uploader_core::RecordShape;

/// Record store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid record id: {0}")]
    InvalidId(String),

    #[error("Record does not match schema: {0}")]
    Validation(String),

    #[error("Store backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Effect of a partial update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A record matched and at least one field changed
    Modified,
    /// A record matched but the merge changed nothing
    Unchanged,
    /// No record has this id
    NotMatched,
}

/// Record store abstraction trait
///
/// Every backend enforces the configured record shape on writes: documents
/// with missing, empty, mistyped or undeclared fields fail with
/// [`StoreError::Validation`]. Identifiers are 24-character hex ObjectIds;
/// anything else fails with [`StoreError::InvalidId`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records in insertion order
    async fn list_all(&self) -> StoreResult<Vec<ImageRecord>>;

    /// One record, or `NotFound`
    async fn find_by_id(&self, id: &str) -> StoreResult<ImageRecord>;

    /// Insert a record and return the identifier the store assigned
    ///
    /// `fields` must not carry `_id`.
    async fn insert(&self, fields: Document) -> StoreResult<ObjectId>;

    /// Merge `partial` into an existing record
    ///
    /// Keys may be dotted paths (`image.url`). An empty `partial` is a no-op
    /// that still reports whether the record exists. A hosted record's
    /// `image.publicId` may be repeated but never changed.
    async fn update(&self, id: &str, partial: Document) -> StoreResult<UpdateOutcome>;

    /// Remove a record; `false` when nothing matched
    async fn delete_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Parse a record identifier
pub fn parse_record_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

pub(crate) fn reject_client_id(fields: &Document) -> StoreResult<()> {
    if fields.contains_key(ID_FIELD) {
        return Err(StoreError::Validation(
            "'_id' is assigned by the store".to_string(),
        ));
    }
    Ok(())
}

/// Partial updates may only name record fields: no `_id`, no operators, no empty path
/// segments, and no path nested inside another path of the same update.
pub(crate) fn check_partial(partial: &Document) -> StoreResult<()> {
    for key in partial.keys() {
        let first = key.split('.').next().unwrap_or_default();
        if first == ID_FIELD {
            return Err(StoreError::Validation("'_id' is immutable".to_string()));
        }
        if key.starts_with('$') || key.split('.').any(str::is_empty) {
            return Err(StoreError::Validation(format!(
                "field '{}' is not allowed",
                key
            )));
        }
    }

    for parent in partial.keys() {
        let prefix = format!("{}.", parent);
        if let Some(child) = partial.keys().find(|k| k.starts_with(&prefix)) {
            return Err(StoreError::Validation(format!(
                "fields '{}' and '{}' overlap",
                parent, child
            )));
        }
    }
    Ok(())
}

/// Media host id named by a hosted partial update, either as `image.publicId`
/// or inside a replacement `image` object.
///
/// The id ties a record to its media host object; backends only apply the
/// update when it equals the stored one.
pub(crate) fn pinned_public_id(shape: RecordShape, partial: &Document) -> Option<Bson> {
    if !shape.uses_media_host() {
        return None;
    }
    if let Some(value) = partial.get("image.publicId") {
        return Some(value.clone());
    }
    match partial.get("image") {
        Some(Bson::Document(image)) => image.get("publicId").cloned(),
        _ => None,
    }
}

pub(crate) fn public_id_changed(id: &str) -> StoreError {
    StoreError::Validation(format!(
        "'image.publicId' of record {} is assigned by the media host and cannot change",
        id
    ))
}
