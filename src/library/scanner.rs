// Filesystem scanner for the local photos folder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extensions recognized as images, matched case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff"];

/// A photo found on disk. Ephemeral: recomputed on every listing request,
/// identity is the absolute path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalPhoto {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub modified: String,
}

/// Default photos folder: ~/Desktop/local_photos
pub fn default_photos_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Desktop")
        .join("local_photos")
}

/// Check whether a path carries a recognized image extension
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// List image files directly under `dir`, with name, absolute path, byte size
/// and modification time.
///
/// A missing directory yields an empty list rather than an error. A per-file
/// stat failure drops that file from the result and is only logged; the rest
/// of the listing proceeds.
pub fn list_photos(dir: &Path) -> Vec<LocalPhoto> {
    if !dir.exists() {
        log::info!("Photos directory {:?} does not exist", dir);
        return Vec::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Failed to read photos directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut photos = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read directory entry in {:?}: {}", dir, e);
                continue;
            }
        };

        let path = entry.path();
        if !has_image_extension(&path) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Failed to stat {:?}, dropping from listing: {}", path, e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
            .unwrap_or_else(|_| Utc::now().to_rfc3339());

        photos.push(LocalPhoto {
            name: entry.file_name().to_string_lossy().to_string(),
            path: path.to_string_lossy().to_string(),
            size: metadata.len(),
            modified,
        });
    }

    // Stable order: newest first, path as tiebreaker
    photos.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.path.cmp(&b.path)));
    photos
}
