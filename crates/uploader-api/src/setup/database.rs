//! Record store setup

use anyhow::{Context, Result};
use std::sync::Arc;
use uploader_core::Config;
use uploader_db::{create_record_store, RecordStore};

/// Create the configured record store
///
/// For MongoDB this pings the server and applies the schema guard.
pub async fn setup_record_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    tracing::info!(
        backend = %config.store_backend,
        database = %config.database_name,
        collection = %config.collection_name,
        "Connecting to record store"
    );

    let store = create_record_store(config)
        .await
        .context("Failed to initialize record store")?;

    tracing::info!("Record store ready, schema validation applied");
    Ok(store)
}
