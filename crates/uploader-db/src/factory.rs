use crate::{MemoryRecordStore, MongoRecordStore, RecordStore, StoreError, StoreResult};
use std::sync::Arc;
use uploader_core::{Config, StoreBackend};

/// Create a record store based on configuration
///
/// The MongoDB backend connects and applies the schema guard before returning.
pub async fn create_record_store(config: &Config) -> StoreResult<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Mongo => {
            let uri = config
                .mongodb_uri
                .as_deref()
                .ok_or_else(|| StoreError::ConfigError("MONGODB_URI not configured".to_string()))?;

            let store = MongoRecordStore::connect(
                uri,
                &config.database_name,
                &config.collection_name,
                config.record_shape,
            )
            .await?;
            Ok(Arc::new(store))
        }

        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new(config.record_shape)))
        }
    }
}
