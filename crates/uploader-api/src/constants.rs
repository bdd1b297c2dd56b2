//! Application-wide constants

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Mount point of the local media host's files
pub const MEDIA_MOUNT_PATH: &str = "/media";

/// Multipart framing allowance on top of the file size limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Default server-wide concurrency limit
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;
