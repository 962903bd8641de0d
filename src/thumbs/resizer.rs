// Narrow resize capability so the concrete codec library stays swappable

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;

/// How the source image is mapped into the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Fill the box entirely, cropping overflow (centered)
    Cover,
    /// Fit inside the box, preserving aspect ratio
    Contain,
}

/// The only image-processing capability the app depends on.
pub trait Resizer: Send + Sync {
    fn resize(&self, image: &DynamicImage, width: u32, height: u32, fit: FitMode)
        -> DynamicImage;
}

/// Resizer backed by the `image` crate (Lanczos3 filtering).
#[derive(Debug, Default)]
pub struct CoverFitResizer;

impl Resizer for CoverFitResizer {
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        fit: FitMode,
    ) -> DynamicImage {
        match fit {
            FitMode::Cover => image.resize_to_fill(width, height, FilterType::Lanczos3),
            FitMode::Contain => image.resize(width, height, FilterType::Lanczos3),
        }
    }
}

/// Decode `source`, resize per `fit`, and encode as JPEG at the given quality.
pub fn resize_file_to_jpeg(
    resizer: &dyn Resizer,
    source: &std::path::Path,
    width: u32,
    height: u32,
    fit: FitMode,
    quality: u8,
) -> Result<Vec<u8>> {
    let img = image::ImageReader::open(source)
        .with_context(|| format!("Failed to open image {:?}", source))?
        .with_guessed_format()
        .context("Failed to guess image format")?
        .decode()
        .with_context(|| format!("Failed to decode image {:?}", source))?;

    let resized = resizer.resize(&img, width, height, fit);
    encode_jpeg(&resized, quality)
}

/// Encode a decoded image as JPEG.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    // JPEG has no alpha channel
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .context("Failed to encode JPEG")?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(w, h, image::Rgb([128, 64, 32])))
    }

    #[test]
    fn test_cover_fit_fills_target_box() {
        let resizer = CoverFitResizer;
        let img = test_image(400, 100);
        let out = resizer.resize(&img, 50, 50, FitMode::Cover);
        assert_eq!((out.width(), out.height()), (50, 50));
    }

    #[test]
    fn test_contain_preserves_aspect_ratio() {
        let resizer = CoverFitResizer;
        let img = test_image(400, 100);
        let out = resizer.resize(&img, 50, 50, FitMode::Contain);
        assert_eq!((out.width(), out.height()), (50, 13));
    }

    #[test]
    fn test_encode_jpeg_produces_decodable_bytes() {
        let img = test_image(8, 8);
        let bytes = encode_jpeg(&img, 85).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }
}
