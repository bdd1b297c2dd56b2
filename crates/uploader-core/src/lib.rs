//! Uploader Core Library
//!
//! This crate provides the record models, error types, configuration and the
//! record-shape schema shared by the store, media host and API crates.

pub mod backend_types;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;

// Re-export commonly used types
pub use backend_types::{MediaHostBackend, StoreBackend};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use schema::{FieldKind, FieldSpec, RecordShape, SchemaViolation};
