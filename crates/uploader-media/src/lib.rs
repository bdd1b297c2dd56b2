//! Uploader Media Library
//!
//! This crate provides the media host abstraction used by hosted records and
//! its implementations for Cloudinary and the local filesystem.
//!
//! # Public ids
//!
//! A media host names every stored object by a public id of the form
//! `{folder}/{name}`. The id is what records keep in `image.publicId` and what
//! [`MediaHost::delete`] takes. Ids must not contain `..` or a leading `/`.

#[cfg(feature = "media-cloudinary")]
pub mod cloudinary;
pub mod factory;
#[cfg(feature = "media-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "media-cloudinary")]
pub use cloudinary::CloudinaryHost;
pub use factory::create_media_host;
#[cfg(feature = "media-local")]
pub use local::LocalMediaHost;
pub use traits::{MediaHost, MediaHostError, MediaHostResult, UploadedImage};
pub use uploader_core::MediaHostBackend;
