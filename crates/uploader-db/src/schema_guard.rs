//! Schema guard
//!
//! Locks the record collection to the configured shape before the service
//! accepts traffic. The collection's validator is replaced in place; when the
//! collection does not exist yet it is created with the validator attached.

use bson::doc;
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use mongodb::Database;
use uploader_core::RecordShape;

use crate::traits::{StoreError, StoreResult};

/// Server error code for `NamespaceNotFound`
pub const NAMESPACE_NOT_FOUND: i32 = 26;

/// Server error code for `DocumentValidationFailure`
pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// Server error code for `PathNotViable` (`$set` through a non-object field)
pub const PATH_NOT_VIABLE: i32 = 28;

/// Server error code for `ConflictingUpdateOperators` (overlapping `$set` paths)
pub const CONFLICTING_UPDATE_OPERATORS: i32 = 40;

/// Numeric server error code carried by a driver error, if any
pub(crate) fn server_error_code(err: &DriverError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(concern)) => Some(concern.code),
        _ => None,
    }
}

fn is_namespace_not_found(err: &DriverError) -> bool {
    if let ErrorKind::Command(command) = err.kind.as_ref() {
        return command.code == NAMESPACE_NOT_FOUND || command.code_name == "NamespaceNotFound";
    }
    false
}

/// Apply the record shape's validator to `collection`.
///
/// Idempotent. Any failure other than a missing collection is returned and
/// must abort startup.
#[tracing::instrument(skip(database), fields(db.name = %database.name(), db.collection = %collection))]
pub async fn apply_schema_validation(
    database: &Database,
    collection: &str,
    shape: RecordShape,
) -> StoreResult<()> {
    let validator = shape.validator();

    let result = database
        .run_command(doc! {
            "collMod": collection,
            "validator": validator.clone(),
            "validationLevel": "strict",
            "validationAction": "error",
        })
        .await;

    match result {
        Ok(_) => {
            tracing::info!(shape = %shape, "Updated collection validator");
            Ok(())
        }
        Err(err) if is_namespace_not_found(&err) => {
            tracing::info!(shape = %shape, "Collection missing, creating it with validator");
            database
                .create_collection(collection)
                .validator(validator)
                .await
                .map_err(|e| {
                    StoreError::BackendError(format!(
                        "Failed to create collection {}: {}",
                        collection, e
                    ))
                })
        }
        Err(err) => Err(StoreError::BackendError(format!(
            "Failed to apply schema validation to {}: {}",
            collection, err
        ))),
    }
}
