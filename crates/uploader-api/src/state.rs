//! Application state
//!
//! Built once by `setup::initialize_app` and shared read-only by every handler.

use std::sync::Arc;
use uploader_core::{Config, RecordShape};
use uploader_db::RecordStore;
use uploader_media::MediaHost;

/// Media host wiring for hosted records
#[derive(Clone)]
pub struct HostedMedia {
    pub host: Arc<dyn MediaHost>,
    /// Folder every upload is placed in
    pub folder: String,
    /// Largest accepted upload in bytes
    pub max_file_size: usize,
}

/// How image bytes reach the record
#[derive(Clone)]
pub enum MediaState {
    /// Records reference an object uploaded to the media host
    Hosted(HostedMedia),
    /// Records carry a client-supplied URL
    Direct,
}

impl MediaState {
    pub fn shape(&self) -> RecordShape {
        match self {
            MediaState::Hosted(_) => RecordShape::Hosted,
            MediaState::Direct => RecordShape::Direct,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub media: MediaState,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>, media: MediaState) -> Self {
        Self {
            config,
            store,
            media,
        }
    }
}
