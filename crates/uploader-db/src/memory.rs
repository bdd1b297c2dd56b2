//! Process-local record store
//!
//! Keeps documents in insertion order behind a [`RwLock`] and enforces the
//! record shape with the same field list the MongoDB validator is built from.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;
use uploader_core::models::ImageRecord;
use uploader_core::schema::ID_FIELD;
use uploader_core::RecordShape;

use crate::traits::{
    check_partial, parse_record_id, pinned_public_id, public_id_changed, reject_client_id,
    RecordStore, StoreError, StoreResult, UpdateOutcome,
};

#[derive(Clone)]
pub struct MemoryRecordStore {
    shape: RecordShape,
    records: Arc<RwLock<Vec<Document>>>,
}

impl MemoryRecordStore {
    pub fn new(shape: RecordShape) -> Self {
        Self {
            shape,
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn check_shape(&self, document: &Document) -> StoreResult<()> {
        self.shape
            .validate(document)
            .map_err(|violation| StoreError::Validation(violation.to_string()))
    }
}

fn document_id(document: &Document) -> Option<ObjectId> {
    document.get_object_id(ID_FIELD).ok()
}

fn from_document(document: &Document) -> StoreResult<ImageRecord> {
    bson::from_document(document.clone())
        .map_err(|e| StoreError::BackendError(format!("Stored record is unreadable: {}", e)))
}

/// Set a dotted `path` inside `target`, creating intermediate documents.
fn set_path(target: &mut Document, path: &str, value: Bson) -> StoreResult<()> {
    match path.split_once('.') {
        None => {
            target.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Bson::Document(Document::new()));
            match child {
                Bson::Document(inner) => set_path(inner, rest, value),
                _ => Err(StoreError::Validation(format!(
                    "cannot set '{}': '{}' is not an object",
                    path, head
                ))),
            }
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_all(&self) -> StoreResult<Vec<ImageRecord>> {
        let records = self.records.read().await;
        records.iter().map(from_document).collect()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<ImageRecord> {
        let object_id = parse_record_id(id)?;
        let records = self.records.read().await;

        records
            .iter()
            .find(|doc| document_id(doc) == Some(object_id))
            .map(from_document)
            .unwrap_or_else(|| Err(StoreError::NotFound(id.to_string())))
    }

    async fn insert(&self, fields: Document) -> StoreResult<ObjectId> {
        reject_client_id(&fields)?;
        self.check_shape(&fields)?;

        let id = ObjectId::new();
        let mut document = Document::new();
        document.insert(ID_FIELD, id);
        for (key, value) in fields {
            document.insert(key, value);
        }

        self.records.write().await.push(document);
        tracing::debug!(id = %id, "Inserted record");
        Ok(id)
    }

    async fn update(&self, id: &str, partial: Document) -> StoreResult<UpdateOutcome> {
        let object_id = parse_record_id(id)?;
        check_partial(&partial)?;

        let mut records = self.records.write().await;
        let Some(existing) = records
            .iter_mut()
            .find(|doc| document_id(doc) == Some(object_id))
        else {
            return Ok(UpdateOutcome::NotMatched);
        };

        if let Some(public_id) = pinned_public_id(self.shape, &partial) {
            let stored = existing
                .get_document("image")
                .ok()
                .and_then(|image| image.get("publicId"));
            if stored != Some(&public_id) {
                return Err(public_id_changed(id));
            }
        }

        let mut merged = existing.clone();
        for (path, value) in partial {
            set_path(&mut merged, &path, value)?;
        }
        self.check_shape(&merged)?;

        if merged == *existing {
            return Ok(UpdateOutcome::Unchanged);
        }
        *existing = merged;
        Ok(UpdateOutcome::Modified)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let object_id = parse_record_id(id)?;
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|doc| document_id(doc) != Some(object_id));
        Ok(records.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
