// Gallery view state: pagination, filtering and lazy-load bookkeeping

pub mod lazy;
pub mod search;
pub mod state;

pub use lazy::LazyLoadTracker;
pub use search::{reconcile_path_matches, FilterOutcome};
pub use state::{GalleryEvent, GalleryState, DESKTOP_PAGE_SIZE, REMOTE_PAGE_SIZE};
