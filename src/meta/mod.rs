// Photo metadata: EXIF extraction and reverse geocoding

pub mod extract;
pub mod geocode;

pub use extract::{extract_capture_date, extract_gps_coords, GpsCoordinates};
pub use geocode::{format_coordinates, NominatimClient};
