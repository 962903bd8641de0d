// Immutable gallery snapshots updated by pure reducers.
//
// Every filter change bumps a request generation; a response carrying an
// older generation is stale (superseded by a newer filter) and is dropped
// instead of clobbering the current view.

use serde::{Deserialize, Serialize};

use crate::library::LocalPhoto;

/// Page size for the local (desktop) listing
pub const DESKTOP_PAGE_SIZE: usize = 50;
/// Page size for server-side pagination against the backend
pub const REMOTE_PAGE_SIZE: usize = 20;

/// Events a view can feed into the reducer
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// Full photo listing arrived (tagged with the generation it was
    /// requested under)
    PhotosLoaded {
        generation: u64,
        photos: Vec<LocalPhoto>,
    },
    /// The search box settled on a new query (after debounce)
    FilterChanged { query: String },
    /// Filtered set resolved for the query dispatched at `generation`
    FilterResolved {
        generation: u64,
        photos: Vec<LocalPhoto>,
        notice: Option<String>,
    },
    /// User asked for the next page
    LoadMore,
}

/// Snapshot of everything the gallery view renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryState {
    /// Monotonically increasing request generation; bumped on each filter
    /// change so stale in-flight responses can be detected
    pub generation: u64,
    /// Active search query, empty when unfiltered
    pub query: String,
    /// All known photos, unfiltered
    pub all_photos: Vec<LocalPhoto>,
    /// Photos matching the active filter (identity copy when unfiltered)
    pub filtered_photos: Vec<LocalPhoto>,
    /// Number of pages currently rendered
    pub pages_loaded: usize,
    pub page_size: usize,
    /// User-visible notice (e.g. remote search degraded to filename match)
    pub notice: Option<String>,
}

impl GalleryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            generation: 0,
            query: String::new(),
            all_photos: Vec::new(),
            filtered_photos: Vec::new(),
            pages_loaded: 0,
            page_size: page_size.max(1),
            notice: None,
        }
    }

    /// Photos visible after `pages_loaded` pages:
    /// min(pages * page_size, filtered len), never shrinking within a filter
    pub fn displayed(&self) -> &[LocalPhoto] {
        let count = self.displayed_count();
        &self.filtered_photos[..count]
    }

    pub fn displayed_count(&self) -> usize {
        (self.pages_loaded * self.page_size).min(self.filtered_photos.len())
    }

    pub fn has_more(&self) -> bool {
        self.displayed_count() < self.filtered_photos.len()
    }

    /// Pure reducer: current snapshot + event -> next snapshot.
    pub fn apply(&self, event: GalleryEvent) -> GalleryState {
        match event {
            GalleryEvent::PhotosLoaded { generation, photos } => {
                if generation < self.generation {
                    log::debug!(
                        "Dropping stale photo listing (generation {} < {})",
                        generation,
                        self.generation
                    );
                    return self.clone();
                }
                let mut next = self.clone();
                next.all_photos = photos.clone();
                if next.query.is_empty() {
                    next.filtered_photos = photos;
                    next.pages_loaded = 1;
                }
                next
            }
            GalleryEvent::FilterChanged { query } => {
                let mut next = self.clone();
                next.generation += 1;
                next.query = query;
                next.notice = None;
                // Pagination resets and the rendered set is replaced
                next.pages_loaded = 0;
                next.filtered_photos = Vec::new();
                if next.query.is_empty() {
                    next.filtered_photos = next.all_photos.clone();
                    next.pages_loaded = 1;
                }
                next
            }
            GalleryEvent::FilterResolved {
                generation,
                photos,
                notice,
            } => {
                if generation != self.generation {
                    log::debug!(
                        "Dropping stale filter result (generation {} != {})",
                        generation,
                        self.generation
                    );
                    return self.clone();
                }
                let mut next = self.clone();
                next.filtered_photos = photos;
                next.notice = notice;
                next.pages_loaded = 1;
                next
            }
            GalleryEvent::LoadMore => {
                let mut next = self.clone();
                if next.has_more() || next.pages_loaded == 0 {
                    next.pages_loaded += 1;
                }
                next
            }
        }
    }
}
