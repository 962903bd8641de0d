// EXIF GPS and capture-date extraction

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use exif::{In, Reader as ExifReader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::io::BufReader;
use std::path::Path;

/// GPS position decoded from EXIF, signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

fn read_exif(path: &Path) -> Option<exif::Exif> {
    let file = std::fs::File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    match ExifReader::new().read_from_container(&mut reader) {
        Ok(exif) => Some(exif),
        Err(e) => {
            log::debug!("No EXIF data in {:?}: {}", path, e);
            None
        }
    }
}

/// Convert a degrees/minutes/seconds rational triple to decimal degrees
fn dms_to_decimal(value: &Value) -> Option<f64> {
    let Value::Rational(rationals) = value else {
        return None;
    };
    let degrees = rationals.first()?.to_f64();
    let minutes = rationals.get(1).map(|r| r.to_f64()).unwrap_or(0.0);
    let seconds = rationals.get(2).map(|r| r.to_f64()).unwrap_or(0.0);
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

/// First ASCII component of a field, as a string
fn ascii_value(field: &exif::Field) -> Option<String> {
    match &field.value {
        Value::Ascii(components) => components
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string()),
        _ => None,
    }
}

fn ref_sign(exif: &exif::Exif, tag: Tag, negative: &str) -> f64 {
    let reference = exif.get_field(tag, In::PRIMARY).and_then(ascii_value);
    match reference {
        Some(r) if r.eq_ignore_ascii_case(negative) => -1.0,
        _ => 1.0,
    }
}

/// Extract GPS coordinates from an image's EXIF block. `None` when the file
/// has no EXIF data or no GPS fields.
pub fn extract_gps_coords(path: &Path) -> Option<GpsCoordinates> {
    let exif = read_exif(path)?;

    let latitude = exif
        .get_field(Tag::GPSLatitude, In::PRIMARY)
        .and_then(|f| dms_to_decimal(&f.value))?;
    let longitude = exif
        .get_field(Tag::GPSLongitude, In::PRIMARY)
        .and_then(|f| dms_to_decimal(&f.value))?;

    let latitude = latitude * ref_sign(&exif, Tag::GPSLatitudeRef, "S");
    let longitude = longitude * ref_sign(&exif, Tag::GPSLongitudeRef, "W");

    Some(GpsCoordinates {
        latitude,
        longitude,
    })
}

/// Parse the EXIF "YYYY:MM:DD HH:MM:SS" date format. EXIF carries no
/// timezone, so the value is taken as UTC.
pub fn parse_exif_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Extract when the photo was taken, trying EXIF fields from most to least
/// accurate: DateTimeOriginal, then DateTimeDigitized, then DateTime.
pub fn extract_capture_date(path: &Path) -> Option<DateTime<Utc>> {
    let exif = read_exif(path)?;

    for tag in [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime] {
        if let Some(parsed) = exif
            .get_field(tag, In::PRIMARY)
            .and_then(ascii_value)
            .and_then(|raw| parse_exif_datetime(&raw))
        {
            return Some(parsed);
        }
    }
    None
}
