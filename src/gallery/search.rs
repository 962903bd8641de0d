// Search-result reconciliation for the desktop listing.
//
// The remote endpoint returns matches keyed by filesystem path; the local
// photo set is intersected against them. When the endpoint is unreachable
// the filter degrades to a local case-insensitive filename match, with a
// notice the view surfaces to the user.

use std::collections::HashSet;

use crate::library::LocalPhoto;

/// Notice shown when remote search degraded to a local filename match
pub const DEGRADED_SEARCH_NOTICE: &str = "Search service unavailable - using filename search";

/// Result of resolving a filter query against the photo set
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub photos: Vec<LocalPhoto>,
    pub notice: Option<String>,
}

/// Intersect the local photo set with the paths a remote search returned,
/// preserving local listing order.
pub fn reconcile_path_matches(all_photos: &[LocalPhoto], matched_paths: &[String]) -> FilterOutcome {
    let matched: HashSet<&str> = matched_paths.iter().map(|p| p.as_str()).collect();
    let photos = all_photos
        .iter()
        .filter(|photo| matched.contains(photo.path.as_str()))
        .cloned()
        .collect();
    FilterOutcome {
        photos,
        notice: None,
    }
}

/// Local fallback: case-insensitive substring match on filename.
pub fn filename_fallback(all_photos: &[LocalPhoto], query: &str) -> FilterOutcome {
    let needle = query.to_lowercase();
    let photos = all_photos
        .iter()
        .filter(|photo| photo.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    FilterOutcome {
        photos,
        notice: Some(DEGRADED_SEARCH_NOTICE.to_string()),
    }
}
