//! Configuration module
//!
//! Configuration is read once from the environment (and an optional `.env`
//! file) before the service starts.

use std::env;

use crate::backend_types::{MediaHostBackend, StoreBackend};
use crate::schema::RecordShape;

const DEFAULT_PORT: u16 = 5200;
const DEFAULT_DATABASE_NAME: &str = "SimpleImageUploader";
const DEFAULT_COLLECTION_NAME: &str = "images";
const DEFAULT_UPLOAD_FOLDER: &str = "Simple-Image-Uploader";
const DEFAULT_CLOUDINARY_API_BASE_URL: &str = "https://api.cloudinary.com";
const DEFAULT_LOCAL_MEDIA_PATH: &str = "./media";
const MAX_FILE_SIZE_MB: usize = 10;

/// Cloudinary account credentials
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub log_format: String,
    // Record store
    pub record_shape: RecordShape,
    pub store_backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub collection_name: String,
    // Media host
    pub media_host_backend: MediaHostBackend,
    pub cloudinary: Option<CloudinaryCredentials>,
    pub cloudinary_api_base_url: String,
    pub upload_folder: String,
    pub local_media_path: String,
    pub local_media_base_url: String,
    // Uploads
    pub max_file_size_bytes: usize,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Upload limit in bytes from a `MAX_FILE_SIZE_MB` value
fn parse_max_file_size(raw: Option<&str>) -> Result<usize, anyhow::Error> {
    let mb = match raw {
        Some(value) => value.parse::<usize>().map_err(|_| {
            anyhow::anyhow!("MAX_FILE_SIZE_MB must be a whole number of megabytes")
        })?,
        None => MAX_FILE_SIZE_MB,
    };
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", mb))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let record_shape = env::var("RECORD_SHAPE")
            .unwrap_or_else(|_| RecordShape::Hosted.to_string())
            .parse()?;

        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| StoreBackend::Mongo.to_string())
            .parse()?;

        let media_host_backend = env::var("MEDIA_HOST_BACKEND")
            .unwrap_or_else(|_| MediaHostBackend::Cloudinary.to_string())
            .parse()?;

        let cloudinary = match (
            optional_var("CLOUDINARY_CLOUD_NAME"),
            optional_var("CLOUDINARY_API_KEY"),
            optional_var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let max_file_size_bytes =
            parse_max_file_size(optional_var("MAX_FILE_SIZE_MB").as_deref())?;

        Ok(Config {
            server_port,
            cors_origins,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
            record_shape,
            store_backend,
            mongodb_uri: optional_var("MONGODB_URI"),
            database_name: optional_var("DATABASE_NAME")
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            collection_name: optional_var("COLLECTION_NAME")
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
            media_host_backend,
            cloudinary,
            cloudinary_api_base_url: optional_var("CLOUDINARY_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE_URL.to_string()),
            upload_folder: optional_var("UPLOAD_FOLDER")
                .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string()),
            local_media_path: optional_var("LOCAL_MEDIA_PATH")
                .unwrap_or_else(|| DEFAULT_LOCAL_MEDIA_PATH.to_string()),
            local_media_base_url: optional_var("LOCAL_MEDIA_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/media", server_port)),
            max_file_size_bytes,
            environment,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Whether uploads go to a media host
    pub fn uses_media_host(&self) -> bool {
        self.record_shape.uses_media_host()
    }
}

impl Default for Config {
    /// Development defaults: direct records in the memory store.
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            log_format: "compact".to_string(),
            record_shape: RecordShape::Direct,
            store_backend: StoreBackend::Memory,
            mongodb_uri: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            media_host_backend: MediaHostBackend::Local,
            cloudinary: None,
            cloudinary_api_base_url: DEFAULT_CLOUDINARY_API_BASE_URL.to_string(),
            upload_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            local_media_path: DEFAULT_LOCAL_MEDIA_PATH.to_string(),
            local_media_base_url: format!("http://localhost:{}/media", DEFAULT_PORT),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
        }
    }
}
