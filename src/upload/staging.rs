// Staging area for photos selected for upload.
//
// Files land here before submission: non-images are rejected with a
// skipped-count notice, each accepted file gets a preview entry whose
// location is filled in asynchronously (EXIF GPS -> reverse geocode), and
// submission turns the whole set into one upload batch.

use anyhow::{Context, Result};
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::backend::UploadPhoto;
use crate::meta::extract_capture_date;
use crate::thumbs::resizer::{encode_jpeg, CoverFitResizer, FitMode, Resizer};

/// Uploads are resized so the long edge is at most this many pixels
pub const MAX_UPLOAD_DIMENSION: u32 = 512;

const UPLOAD_JPEG_QUALITY: u8 = 85;
const DEFAULT_LOCATION: &str = "Unknown Location";

/// One staged file awaiting upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewPhoto {
    pub id: Uuid,
    pub path: String,
    pub name: String,
    pub size: u64,
    pub location: String,
    pub location_loading: bool,
    pub location_error: Option<String>,
    /// EXIF capture date, RFC3339, when one was found
    pub date_taken: Option<String>,
}

/// Result of staging a dropped/selected set of files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropOutcome {
    pub accepted: Vec<PreviewPhoto>,
    pub skipped_count: usize,
    /// Present iff any file was skipped
    pub notice: Option<String>,
}

/// The staging area itself. Single-threaded view state; commands mutate it
/// under the app-state lock.
#[derive(Debug, Default)]
pub struct UploadStaging {
    previews: Vec<PreviewPhoto>,
}

/// Content sniff: a file counts as an image when the decoder recognizes
/// its magic bytes, regardless of extension.
fn is_image_file(path: &Path) -> bool {
    match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader.format().is_some(),
        Err(_) => false,
    }
}

impl UploadStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previews(&self) -> &[PreviewPhoto] {
        &self.previews
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Stage a batch of selected files. Non-image files are counted and
    /// reported, never staged; staging of the valid files proceeds.
    pub fn add_files(&mut self, paths: Vec<PathBuf>) -> DropOutcome {
        let total = paths.len();
        let mut accepted = Vec::new();

        for path in paths {
            if !is_image_file(&path) {
                log::info!("Skipping non-image file {:?}", path);
                continue;
            }

            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let date_taken = extract_capture_date(&path).map(|d| d.to_rfc3339());

            let preview = PreviewPhoto {
                id: Uuid::new_v4(),
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: path.to_string_lossy().to_string(),
                size,
                location: DEFAULT_LOCATION.to_string(),
                location_loading: true,
                location_error: None,
                date_taken,
            };
            self.previews.push(preview.clone());
            accepted.push(preview);
        }

        let skipped_count = total - accepted.len();
        DropOutcome {
            notice: (skipped_count > 0)
                .then(|| "Some files were skipped. Only image files are allowed.".to_string()),
            accepted,
            skipped_count,
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&PreviewPhoto> {
        self.previews.iter().find(|p| p.id == id)
    }

    /// Record the outcome of a location-extraction attempt for one preview.
    pub fn set_location_result(&mut self, id: Uuid, result: Result<Option<String>, String>) {
        let Some(preview) = self.previews.iter_mut().find(|p| p.id == id) else {
            log::debug!("Location result for removed preview {}", id);
            return;
        };
        preview.location_loading = false;
        match result {
            Ok(Some(location)) => {
                preview.location = location;
                preview.location_error = None;
            }
            Ok(None) => {
                preview.location = DEFAULT_LOCATION.to_string();
                preview.location_error = Some("No GPS data found".to_string());
            }
            Err(message) => {
                preview.location_error = Some(message);
            }
        }
    }

    /// Mark a preview as re-extracting its location (user-triggered retry).
    pub fn mark_location_loading(&mut self, id: Uuid) -> bool {
        match self.previews.iter_mut().find(|p| p.id == id) {
            Some(preview) => {
                preview.location_loading = true;
                preview.location_error = None;
                true
            }
            None => false,
        }
    }

    /// User edited the location text for one preview.
    pub fn update_location(&mut self, id: Uuid, location: String) -> bool {
        match self.previews.iter_mut().find(|p| p.id == id) {
            Some(preview) => {
                preview.location = location;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.previews.len();
        self.previews.retain(|p| p.id != id);
        self.previews.len() < before
    }

    pub fn clear(&mut self) {
        self.previews.clear();
    }

    /// Build the upload batch: every staged file resized, encoded, and
    /// paired with its location and timestamp. A per-file preparation
    /// failure is logged and that file is dropped from the batch.
    pub fn prepare_batch(&self) -> Vec<UploadPhoto> {
        let mut batch = Vec::with_capacity(self.previews.len());
        for (index, preview) in self.previews.iter().enumerate() {
            log::info!(
                "Preparing photo {} of {}: {}",
                index + 1,
                self.previews.len(),
                preview.name
            );
            match prepare_upload_photo(preview) {
                Ok(photo) => batch.push(photo),
                Err(e) => {
                    log::warn!("Failed to prepare {} for upload: {}", preview.name, e);
                }
            }
        }
        batch
    }
}

/// Resize one staged file to [`MAX_UPLOAD_DIMENSION`], JPEG-encode it, and
/// base64 the result. Timestamp: EXIF capture date, else now.
fn prepare_upload_photo(preview: &PreviewPhoto) -> Result<UploadPhoto> {
    let path = Path::new(&preview.path);
    let img = image::ImageReader::open(path)
        .with_context(|| format!("Failed to open {:?}", path))?
        .with_guessed_format()
        .context("Failed to guess image format")?
        .decode()
        .with_context(|| format!("Failed to decode {:?}", path))?;

    let resized = if img.width() > MAX_UPLOAD_DIMENSION || img.height() > MAX_UPLOAD_DIMENSION {
        CoverFitResizer.resize(
            &img,
            MAX_UPLOAD_DIMENSION,
            MAX_UPLOAD_DIMENSION,
            FitMode::Contain,
        )
    } else {
        img
    };

    let jpeg = encode_jpeg(&resized, UPLOAD_JPEG_QUALITY)?;
    let data = base64::engine::general_purpose::STANDARD.encode(&jpeg);

    let timestamp = preview
        .date_taken
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    Ok(UploadPhoto {
        data,
        location: if preview.location.is_empty() {
            DEFAULT_LOCATION.to_string()
        } else {
            preview.location.clone()
        },
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(w, h, image::Rgb([50, 100, 150]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_drop_stages_images_and_counts_skips() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.jpg", 4, 4);
        let b = write_image(dir.path(), "b.png", 4, 4);
        let c = write_image(dir.path(), "c.png", 4, 4);
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"hello").unwrap();

        let mut staging = UploadStaging::new();
        let outcome = staging.add_files(vec![a, b, c, text]);

        assert_eq!(outcome.accepted.len(), 3);
        assert_eq!(outcome.skipped_count, 1);
        assert!(outcome.notice.is_some());
        assert_eq!(staging.len(), 3);
    }

    #[test]
    fn test_drop_without_skips_has_no_notice() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.jpg", 4, 4);

        let mut staging = UploadStaging::new();
        let outcome = staging.add_files(vec![a]);
        assert_eq!(outcome.skipped_count, 0);
        assert!(outcome.notice.is_none());
    }

    #[test]
    fn test_extension_lies_are_caught_by_sniffing() {
        let dir = tempdir().unwrap();
        let fake = dir.path().join("fake.jpg");
        std::fs::write(&fake, b"plain text wearing a jpg extension").unwrap();

        let mut staging = UploadStaging::new();
        let outcome = staging.add_files(vec![fake]);
        assert_eq!(outcome.accepted.len(), 0);
        assert_eq!(outcome.skipped_count, 1);
    }

    #[test]
    fn test_location_lifecycle() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.jpg", 4, 4);

        let mut staging = UploadStaging::new();
        let id = staging.add_files(vec![a]).accepted[0].id;
        assert!(staging.get(id).unwrap().location_loading);

        staging.set_location_result(id, Ok(Some("Lisbon, Portugal".to_string())));
        let preview = staging.get(id).unwrap();
        assert_eq!(preview.location, "Lisbon, Portugal");
        assert!(!preview.location_loading);
        assert!(preview.location_error.is_none());

        // Retry affordance puts it back into the loading state
        assert!(staging.mark_location_loading(id));
        staging.set_location_result(id, Err("Failed to extract location".to_string()));
        let preview = staging.get(id).unwrap();
        assert_eq!(
            preview.location_error.as_deref(),
            Some("Failed to extract location")
        );
        // Prior/user value survives extraction failure
        assert_eq!(preview.location, "Lisbon, Portugal");
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempdir().unwrap();
        let a = write_image(dir.path(), "a.jpg", 4, 4);
        let b = write_image(dir.path(), "b.jpg", 4, 4);

        let mut staging = UploadStaging::new();
        let outcome = staging.add_files(vec![a, b]);
        let id = outcome.accepted[0].id;

        assert!(staging.remove(id));
        assert!(!staging.remove(id));
        assert_eq!(staging.len(), 1);

        staging.clear();
        assert!(staging.is_empty());
    }

    #[test]
    fn test_prepare_batch_resizes_and_encodes() {
        let dir = tempdir().unwrap();
        let big = write_image(dir.path(), "big.png", 1024, 256);

        let mut staging = UploadStaging::new();
        let id = staging.add_files(vec![big]).accepted[0].id;
        staging.update_location(id, "Somewhere".to_string());

        let batch = staging.prepare_batch();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].location, "Somewhere");
        assert!(chrono::DateTime::parse_from_rfc3339(&batch[0].timestamp).is_ok());

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&batch[0].data)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() <= MAX_UPLOAD_DIMENSION);
        assert!(decoded.height() <= MAX_UPLOAD_DIMENSION);
        // Aspect ratio preserved: 1024x256 -> 512x128
        assert_eq!((decoded.width(), decoded.height()), (512, 128));
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let dir = tempdir().unwrap();
        let small = write_image(dir.path(), "small.png", 32, 16);

        let mut staging = UploadStaging::new();
        staging.add_files(vec![small]);
        let batch = staging.prepare_batch();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&batch[0].data)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }
}
