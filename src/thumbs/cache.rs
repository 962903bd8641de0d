// On-disk thumbnail cache keyed by (source path, size, source mtime)

use anyhow::{Context, Result};
use base64::Engine;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use super::resizer::{resize_file_to_jpeg, CoverFitResizer, FitMode, Resizer};

const JPEG_QUALITY: u8 = 85;

/// Thumbnail cache living under the OS temp directory. Keys embed the source
/// file mtime, so an overwritten source stops hitting its stale entry; old
/// entries are left behind until the temp dir is cleaned.
pub struct ThumbnailCache {
    cache_dir: PathBuf,
    resizer: Box<dyn Resizer>,
}

impl ThumbnailCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            resizer: Box::new(CoverFitResizer),
        }
    }

    /// Default cache directory under the OS temp dir.
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("photo-gallery-thumbnails")
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache key: filesystem-safe base64 of the full source path plus the
    /// requested size and the source mtime (seconds since epoch). Pure in
    /// (path, size, mtime).
    pub fn cache_key(source: &Path, size: u32, mtime_secs: u64) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(source.to_string_lossy().as_bytes())
            .replace(['/', '+', '='], "_");
        format!("{}_{}_{}.jpg", encoded, size, mtime_secs)
    }

    /// Return a path to a cached cover-fit JPEG thumbnail for `source` at
    /// `size`, generating it on a miss. `Ok(None)` means generation failed
    /// and the caller should fall back to the full-resolution original.
    pub fn get_or_generate(&self, source: &Path, size: u32) -> Result<Option<PathBuf>> {
        std::fs::create_dir_all(&self.cache_dir)
            .context("Failed to create thumbnail cache directory")?;

        let mtime_secs = source
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let thumb_path = self.cache_dir.join(Self::cache_key(source, size, mtime_secs));
        if thumb_path.exists() {
            perf_trace!("Thumbnail cache hit: {:?}", thumb_path);
            return Ok(Some(thumb_path));
        }

        let started = std::time::Instant::now();
        let bytes = match resize_file_to_jpeg(
            self.resizer.as_ref(),
            source,
            size,
            size,
            FitMode::Cover,
            JPEG_QUALITY,
        ) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Thumbnail generation failed for {:?}: {}", source, e);
                return Ok(None);
            }
        };

        if let Err(e) = std::fs::write(&thumb_path, &bytes) {
            log::warn!("Failed to write thumbnail {:?}: {}", thumb_path, e);
            return Ok(None);
        }

        perf_debug!(
            "Generated {}px thumbnail for {:?} in {:?}",
            size,
            source,
            started.elapsed()
        );
        Ok(Some(thumb_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_test_image(path: &Path, w: u32, h: u32, shade: u8) {
        let img = image::RgbImage::from_pixel(w, h, image::Rgb([shade, shade, shade]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_cache_key_is_pure() {
        let source = Path::new("/photos/holiday beach.jpg");
        let a = ThumbnailCache::cache_key(source, 300, 1000);
        let b = ThumbnailCache::cache_key(source, 300, 1000);
        assert_eq!(a, b);
        // Size and mtime both participate in the key
        assert_ne!(a, ThumbnailCache::cache_key(source, 150, 1000));
        assert_ne!(a, ThumbnailCache::cache_key(source, 300, 2000));
        // Filesystem-safe: no path separators or padding chars survive
        assert!(!a.contains('/') && !a.contains('+') && !a.contains('='));
    }

    #[test]
    fn test_generate_then_hit_returns_same_path() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src.png");
        write_test_image(&source, 64, 32, 100);

        let cache = ThumbnailCache::new(dir.path().join("thumbs"));
        let first = cache.get_or_generate(&source, 16).unwrap().unwrap();
        let first_mtime = fs::metadata(&first).unwrap().modified().unwrap();

        let second = cache.get_or_generate(&source, 16).unwrap().unwrap();
        assert_eq!(first, second);
        // Hit did not regenerate the file
        assert_eq!(fs::metadata(&second).unwrap().modified().unwrap(), first_mtime);

        let thumb = image::open(&first).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (16, 16));
    }

    #[test]
    fn test_overwritten_source_gets_fresh_thumbnail() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src.png");
        write_test_image(&source, 64, 64, 10);

        let cache = ThumbnailCache::new(dir.path().join("thumbs"));
        let first = cache.get_or_generate(&source, 16).unwrap().unwrap();

        // Overwrite at the same path with a bumped mtime
        write_test_image(&source, 64, 64, 200);
        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
        let file = fs::File::options().write(true).open(&source).unwrap();
        file.set_modified(later).unwrap();
        drop(file);

        let second = cache.get_or_generate(&source, 16).unwrap().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_generation_failure_returns_none() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("broken.jpg");
        fs::write(&source, b"not an image at all").unwrap();

        let cache = ThumbnailCache::new(dir.path().join("thumbs"));
        assert!(cache.get_or_generate(&source, 16).unwrap().is_none());
    }
}
