//! Uploader API Library
//!
//! This crate provides the HTTP handlers for image records and the application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::image_lifecycle::ImageLifecycleService;
pub use state::{AppState, HostedMedia, MediaState};
