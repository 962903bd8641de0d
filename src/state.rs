// State management for Lyfe Photo Gallery

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::client::{BackendClient, BackendConfig};
use crate::gallery::lazy::LazyLoadTracker;
use crate::gallery::state::{GalleryState, DESKTOP_PAGE_SIZE};
use crate::maintenance::delete_flow::DeleteFlow;
use crate::meta::geocode::NominatimClient;
use crate::thumbs::cache::ThumbnailCache;
use crate::upload::staging::UploadStaging;

pub struct AppState {
    /// HTTP client for the remote photo backend
    backend: Arc<BackendClient>,
    /// Reverse geocoding client for GPS coordinates
    geocoder: Arc<NominatimClient>,
    /// On-disk thumbnail cache
    thumbnails: Arc<ThumbnailCache>,
    /// Gallery view state (filter query, pagination, generation counter)
    pub gallery: Arc<RwLock<GalleryState>>,
    /// Photos staged for upload
    pub staging: Arc<RwLock<UploadStaging>>,
    /// Two-phase delete-all-data flow
    pub delete_flow: Arc<RwLock<DeleteFlow>>,
    /// Tracks which thumbnails have already been requested by the viewport
    pub lazy_loads: Arc<RwLock<LazyLoadTracker>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(BackendConfig::default())
    }

    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            backend: Arc::new(BackendClient::new(config)),
            geocoder: Arc::new(NominatimClient::new()),
            thumbnails: Arc::new(ThumbnailCache::new(ThumbnailCache::default_dir())),
            gallery: Arc::new(RwLock::new(GalleryState::new(DESKTOP_PAGE_SIZE))),
            staging: Arc::new(RwLock::new(UploadStaging::new())),
            delete_flow: Arc::new(RwLock::new(DeleteFlow::new())),
            lazy_loads: Arc::new(RwLock::new(LazyLoadTracker::new())),
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Get the backend Arc for cloning (used by background tasks)
    pub fn backend_arc(&self) -> Arc<BackendClient> {
        self.backend.clone()
    }

    pub fn geocoder_arc(&self) -> Arc<NominatimClient> {
        self.geocoder.clone()
    }

    pub fn thumbnails(&self) -> &ThumbnailCache {
        &self.thumbnails
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
