use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::error::Error as DriverError;
use mongodb::{Client, Collection, Database};
use uploader_core::models::ImageRecord;
use uploader_core::RecordShape;

use crate::schema_guard::{
    apply_schema_validation, server_error_code, CONFLICTING_UPDATE_OPERATORS,
    DOCUMENT_VALIDATION_FAILURE, PATH_NOT_VIABLE,
};
use crate::traits::{
    check_partial, parse_record_id, pinned_public_id, public_id_changed, reject_client_id,
    RecordStore, StoreError, StoreResult, UpdateOutcome,
};

/// Server rejections caused by the request body are validation failures.
fn map_driver_error(err: DriverError) -> StoreError {
    match server_error_code(&err) {
        Some(DOCUMENT_VALIDATION_FAILURE | PATH_NOT_VIABLE | CONFLICTING_UPDATE_OPERATORS) => {
            StoreError::Validation(err.to_string())
        }
        _ => StoreError::BackendError(err.to_string()),
    }
}

/// MongoDB-backed record store
///
/// Writes are checked by the collection validator installed by
/// [`apply_schema_validation`]; the server's `DocumentValidationFailure` is
/// reported as [`StoreError::Validation`].
#[derive(Clone)]
pub struct MongoRecordStore {
    database: Database,
    shape: RecordShape,
    records: Collection<ImageRecord>,
    documents: Collection<Document>,
}

impl MongoRecordStore {
    /// Connect, guard the collection schema, and return the store.
    ///
    /// Fails when the server is unreachable or the validator cannot be applied.
    pub async fn connect(
        uri: &str,
        database_name: &str,
        collection_name: &str,
        shape: RecordShape,
    ) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::ConfigError(format!("Invalid MongoDB URI: {}", e)))?;
        let database = client.database(database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::BackendError(format!("MongoDB unreachable: {}", e)))?;

        apply_schema_validation(&database, collection_name, shape).await?;

        tracing::info!(
            database = database_name,
            collection = collection_name,
            "Connected to MongoDB"
        );

        Ok(Self::new(database, collection_name, shape))
    }

    /// Wrap an existing database handle without touching the validator
    pub fn new(database: Database, collection_name: &str, shape: RecordShape) -> Self {
        let documents = database.collection::<Document>(collection_name);
        let records = documents.clone_with_type::<ImageRecord>();
        Self {
            database,
            shape,
            records,
            documents,
        }
    }

    fn collection_name(&self) -> &str {
        self.documents.name()
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    #[tracing::instrument(skip(self), fields(db.collection = %self.collection_name(), db.operation = "find"))]
    async fn list_all(&self) -> StoreResult<Vec<ImageRecord>> {
        let cursor = self
            .records
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(map_driver_error)?;

        cursor.try_collect().await.map_err(map_driver_error)
    }

    #[tracing::instrument(skip(self), fields(db.collection = %self.collection_name(), db.operation = "find_one"))]
    async fn find_by_id(&self, id: &str) -> StoreResult<ImageRecord> {
        let object_id = parse_record_id(id)?;

        self.records
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(map_driver_error)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    #[tracing::instrument(skip(self, fields), fields(db.collection = %self.collection_name(), db.operation = "insert"))]
    async fn insert(&self, fields: Document) -> StoreResult<ObjectId> {
        reject_client_id(&fields)?;

        let result = self
            .documents
            .insert_one(fields)
            .await
            .map_err(map_driver_error)?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::BackendError(format!(
                "Server assigned a non-ObjectId identifier: {}",
                result.inserted_id
            ))
        })
    }

    #[tracing::instrument(skip(self, partial), fields(db.collection = %self.collection_name(), db.operation = "update"))]
    async fn update(&self, id: &str, partial: Document) -> StoreResult<UpdateOutcome> {
        let object_id = parse_record_id(id)?;
        check_partial(&partial)?;

        // `$set` rejects an empty document, so an empty merge only checks existence.
        if partial.is_empty() {
            let existing = self
                .documents
                .find_one(doc! { "_id": object_id })
                .await
                .map_err(map_driver_error)?;
            return Ok(match existing {
                Some(_) => UpdateOutcome::Unchanged,
                None => UpdateOutcome::NotMatched,
            });
        }

        let mut filter = doc! { "_id": object_id };
        let pinned = pinned_public_id(self.shape, &partial);
        if let Some(public_id) = &pinned {
            filter.insert("image.publicId", public_id.clone());
        }

        let result = self
            .documents
            .update_one(filter, doc! { "$set": partial })
            .await
            .map_err(map_driver_error)?;

        if result.matched_count == 0 && pinned.is_some() {
            let exists = self
                .documents
                .find_one(doc! { "_id": object_id })
                .await
                .map_err(map_driver_error)?
                .is_some();
            if exists {
                return Err(public_id_changed(id));
            }
        }

        Ok(if result.matched_count == 0 {
            UpdateOutcome::NotMatched
        } else if result.modified_count == 0 {
            UpdateOutcome::Unchanged
        } else {
            UpdateOutcome::Modified
        })
    }

    #[tracing::instrument(skip(self), fields(db.collection = %self.collection_name(), db.operation = "delete"))]
    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let object_id = parse_record_id(id)?;

        let result = self
            .documents
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(map_driver_error)?;

        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(map_driver_error)
    }
}
