//! Uploader DB Library
//!
//! This crate provides the record store abstraction and its backends: MongoDB
//! for deployments and a process-local store for development and tests. It
//! also owns the schema guard that locks the collection to the record shape.

pub mod factory;
pub mod memory;
pub mod mongo;
pub mod schema_guard;
pub mod traits;

// Re-export commonly used types
pub use factory::create_record_store;
pub use memory::MemoryRecordStore;
pub use mongo::MongoRecordStore;
pub use schema_guard::apply_schema_validation;
pub use traits::{parse_record_id, RecordStore, StoreError, StoreResult, UpdateOutcome};
