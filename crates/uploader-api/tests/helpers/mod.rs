//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p uploader-api`. Every app runs on the
//! in-memory record store; hosted apps use [`FakeMediaHost`] unless a test wires
//! a real local media host.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uploader_api::setup::routes;
use uploader_api::state::{AppState, HostedMedia, MediaState};
use uploader_core::{Config, MediaHostBackend, RecordShape};
use uploader_db::{MemoryRecordStore, RecordStore};
use uploader_media::{MediaHost, MediaHostError, MediaHostResult, UploadedImage};

pub const TEST_FOLDER: &str = "Simple-Image-Uploader";

/// Media host double that records calls and can be told to fail.
#[derive(Default)]
pub struct FakeMediaHost {
    fail_upload: AtomicBool,
    fail_delete: AtomicBool,
    uploads: Mutex<Vec<(String, usize)>>,
    deletes: Mutex<Vec<String>>,
}

impl FakeMediaHost {
    pub fn fail_uploads(&self) {
        self.fail_upload.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    /// Wait for a background delete of `public_id`.
    pub async fn wait_for_delete(&self, public_id: &str) -> bool {
        for _ in 0..50 {
            if self.deletes().iter().any(|d| d == public_id) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
    ) -> MediaHostResult<UploadedImage> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(MediaHostError::Upload("media host unavailable".to_string()));
        }
        let mut uploads = self.uploads.lock().unwrap();
        let public_id = format!("{}/fake-{}", folder, uploads.len());
        uploads.push((filename.to_string(), data.len()));

        Ok(UploadedImage {
            url: format!("https://media.test/{}", public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> MediaHostResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(MediaHostError::Delete("media host unavailable".to_string()));
        }
        self.deletes.lock().unwrap().push(public_id.to_string());
        Ok(())
    }

    fn backend_type(&self) -> MediaHostBackend {
        MediaHostBackend::Cloudinary
    }
}

/// Test application: server plus handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<dyn RecordStore>,
    pub media_host: Arc<FakeMediaHost>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(shape: RecordShape, max_file_size: usize) -> Config {
    Config {
        record_shape: shape,
        media_host_backend: MediaHostBackend::Cloudinary,
        max_file_size_bytes: max_file_size,
        ..Config::default()
    }
}

fn build_app(config: Config, store: Arc<dyn RecordStore>, media: MediaState) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), store, media));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to start test server")
}

/// Hosted app with a size limit of `max_file_size` bytes.
pub fn setup_hosted_app_with_limit(max_file_size: usize) -> TestApp {
    let config = test_config(RecordShape::Hosted, max_file_size);
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new(RecordShape::Hosted));
    let media_host = Arc::new(FakeMediaHost::default());

    let media = MediaState::Hosted(HostedMedia {
        host: media_host.clone(),
        folder: TEST_FOLDER.to_string(),
        max_file_size,
    });

    TestApp {
        server: build_app(config, store.clone(), media),
        store,
        media_host,
    }
}

pub fn setup_hosted_app() -> TestApp {
    setup_hosted_app_with_limit(10 * 1024 * 1024)
}

/// Hosted app whose store enforces the direct shape, so every hosted insert fails.
pub fn setup_hosted_app_with_rejecting_store() -> TestApp {
    let config = test_config(RecordShape::Hosted, 1024 * 1024);
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new(RecordShape::Direct));
    let media_host = Arc::new(FakeMediaHost::default());

    let media = MediaState::Hosted(HostedMedia {
        host: media_host.clone(),
        folder: TEST_FOLDER.to_string(),
        max_file_size: 1024 * 1024,
    });

    TestApp {
        server: build_app(config, store.clone(), media),
        store,
        media_host,
    }
}

pub fn setup_direct_app() -> TestApp {
    let config = test_config(RecordShape::Direct, 10 * 1024 * 1024);
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new(RecordShape::Direct));

    TestApp {
        server: build_app(config, store.clone(), MediaState::Direct),
        store,
        media_host: Arc::new(FakeMediaHost::default()),
    }
}

/// Hosted app backed by a real local media host below `media_dir`, served under `/media`.
pub async fn setup_local_media_app(media_dir: &std::path::Path) -> TestServer {
    let config = Config {
        record_shape: RecordShape::Hosted,
        media_host_backend: MediaHostBackend::Local,
        local_media_path: media_dir.to_string_lossy().to_string(),
        local_media_base_url: "http://localhost/media".to_string(),
        ..Config::default()
    };
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new(RecordShape::Hosted));
    let host = uploader_media::create_media_host(&config)
        .await
        .expect("Failed to create local media host");

    let media = MediaState::Hosted(HostedMedia {
        host,
        folder: TEST_FOLDER.to_string(),
        max_file_size: config.max_file_size_bytes,
    });

    build_app(config, store, media)
}
