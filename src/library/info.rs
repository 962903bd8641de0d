// Image metadata probing (dimensions, format, on-disk size)

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata reported for a single image file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size: u64,
    pub size_formatted: String,
}

/// Probe an image on disk. Returns `None` when the file is missing,
/// unreadable or not a decodable image; the caller treats that as
/// "no info available" rather than an error.
pub fn get_image_info(path: &Path) -> Option<ImageInfo> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::warn!("Failed to stat image {:?}: {}", path, e);
            return None;
        }
    };

    let reader = match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("Failed to open image {:?}: {}", path, e);
            return None;
        }
    };

    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());

    let (width, height) = match reader.into_dimensions() {
        Ok(dims) => dims,
        Err(e) => {
            log::warn!("Failed to read dimensions of {:?}: {}", path, e);
            return None;
        }
    };

    Some(ImageInfo {
        width,
        height,
        format,
        size: metadata.len(),
        size_formatted: format_file_size(metadata.len()),
    })
}

/// Render a byte count for display, e.g. 1536 -> "1.5 KB"
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    // Trim trailing zeros the way parseFloat-style display does
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}
