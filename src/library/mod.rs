// Local photo library for Lyfe Gallery
// Enumerates images in the local photos folder and probes their metadata

pub mod info;
pub mod scanner;

pub use info::{get_image_info, ImageInfo};
pub use scanner::{list_photos, LocalPhoto, IMAGE_EXTENSIONS};
