// Thumbnail generation and on-disk caching

pub mod cache;
pub mod resizer;

pub use cache::ThumbnailCache;
pub use resizer::{CoverFitResizer, FitMode, Resizer};
