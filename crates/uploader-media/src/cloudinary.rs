use crate::traits::{MediaHost, MediaHostError, MediaHostResult, UploadedImage};
use crate::MediaHostBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use uploader_core::config::CloudinaryCredentials;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Every object is stored and destroyed as this resource type.
const RESOURCE_TYPE: &str = "image";

/// Destroy results that leave the object absent.
const DESTROYED_RESULTS: &[&str] = &["ok", "not found"];

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Sign request parameters the way Cloudinary expects.
///
/// Parameters are sorted by name, joined as `name=value` with `&`, and the API
/// secret is appended before hashing with SHA-1. `file`, `api_key` and the
/// signature itself are never signed.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cloudinary media host using the signed upload API
///
/// Uploads and destroys both address the `image` resource type, so a destroy
/// always reaches the object its upload created. Files Cloudinary cannot read
/// as images are rejected at upload.
pub struct CloudinaryHost {
    http_client: Client,
    credentials: CloudinaryCredentials,
    api_base_url: String,
}

impl Debug for CloudinaryHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryHost")
            .field("cloud_name", &self.credentials.cloud_name)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl CloudinaryHost {
    /// Create a new CloudinaryHost
    ///
    /// # Arguments
    /// * `credentials` - Account cloud name, API key and API secret
    /// * `api_base_url` - API root (e.g., "https://api.cloudinary.com")
    pub fn new(credentials: CloudinaryCredentials, api_base_url: String) -> MediaHostResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                MediaHostError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            credentials,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.api_base_url, self.credentials.cloud_name, resource_type, action
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => format!("{} - {}", status, body.error.message),
            Err(_) => format!("{} - {}", status, text),
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
    ) -> MediaHostResult<UploadedImage> {
        let start = std::time::Instant::now();
        let timestamp = Self::timestamp();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.credentials.api_secret,
        );

        let file_part = Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = Form::new()
            .part("file", file_part)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response = self
            .http_client
            .post(self.endpoint(RESOURCE_TYPE, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaHostError::Upload(format!("Request to Cloudinary failed: {}", e)))?;

        if !response.status().is_success() {
            let message = Self::error_message(response).await;
            return Err(MediaHostError::Upload(format!(
                "Cloudinary rejected upload: {}",
                message
            )));
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            MediaHostError::Upload(format!("Failed to parse upload response: {}", e))
        })?;

        tracing::info!(
            public_id = %uploaded.public_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(UploadedImage {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> MediaHostResult<()> {
        let timestamp = Self::timestamp();
        let signature = sign_params(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.credentials.api_secret,
        );

        let response = self
            .http_client
            .post(self.endpoint(RESOURCE_TYPE, "destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.credentials.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MediaHostError::Delete(format!("Request to Cloudinary failed: {}", e)))?;

        if !response.status().is_success() {
            let message = Self::error_message(response).await;
            return Err(MediaHostError::Delete(format!(
                "Cloudinary rejected delete: {}",
                message
            )));
        }

        let destroyed: DestroyResponse = response.json().await.map_err(|e| {
            MediaHostError::Delete(format!("Failed to parse destroy response: {}", e))
        })?;

        if !DESTROYED_RESULTS.contains(&destroyed.result.as_str()) {
            return Err(MediaHostError::Delete(format!(
                "Cloudinary could not destroy {}: {}",
                public_id, destroyed.result
            )));
        }

        tracing::info!(public_id = %public_id, result = %destroyed.result, "Cloudinary delete successful");
        Ok(())
    }

    fn backend_type(&self) -> MediaHostBackend {
        MediaHostBackend::Cloudinary
    }
}
