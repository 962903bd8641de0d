// Reverse geocoding against the public Nominatim API

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::extract::GpsCoordinates;
use crate::backend::BackendError;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
// Nominatim's usage policy requires an identifying User-Agent
const USER_AGENT: &str = "Lyfe-Photo-Gallery/1.0";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NominatimAddress {
    pub road: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimResponse {
    pub display_name: String,
    #[serde(default)]
    pub address: NominatimAddress,
}

/// Client for Nominatim reverse lookups
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, base_url }
    }

    /// Resolve coordinates to a human-readable place name.
    pub async fn reverse_geocode(
        &self,
        coords: GpsCoordinates,
    ) -> Result<Option<String>, BackendError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("Nominatim unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Nominatim returned {}",
                response.status()
            )));
        }

        let parsed: NominatimResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(Some(format_location(&parsed)))
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Join the address parts into a short display string, falling back to the
/// full display name when no parts are present.
pub fn format_location(response: &NominatimResponse) -> String {
    let address = &response.address;
    let parts: Vec<&str> = [
        address.road.as_deref(),
        address.city.as_deref(),
        address.state.as_deref(),
        address.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        response.display_name.clone()
    } else {
        parts.join(", ")
    }
}

/// Pretty-print coordinates, e.g. "48.858275°N, 2.294507°E"
pub fn format_coordinates(coords: &GpsCoordinates) -> String {
    let lat_dir = if coords.latitude >= 0.0 { "N" } else { "S" };
    let lon_dir = if coords.longitude >= 0.0 { "E" } else { "W" };
    format!(
        "{:.6}°{}, {:.6}°{}",
        coords.latitude.abs(),
        lat_dir,
        coords.longitude.abs(),
        lon_dir
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location_joins_address_parts() {
        let response: NominatimResponse = serde_json::from_str(
            r#"{
                "display_name": "Tour Eiffel, 5, Avenue Anatole France, Paris, France",
                "address": {
                    "road": "Avenue Anatole France",
                    "city": "Paris",
                    "state": "Île-de-France",
                    "country": "France",
                    "postcode": "75007"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            format_location(&response),
            "Avenue Anatole France, Paris, Île-de-France, France"
        );
    }

    #[test]
    fn test_format_location_falls_back_to_display_name() {
        let response: NominatimResponse = serde_json::from_str(
            r#"{"display_name": "Southern Ocean"}"#,
        )
        .unwrap();
        assert_eq!(format_location(&response), "Southern Ocean");
    }

    #[test]
    fn test_format_coordinates_hemispheres() {
        let paris = GpsCoordinates {
            latitude: 48.858275,
            longitude: 2.294507,
        };
        assert_eq!(format_coordinates(&paris), "48.858275°N, 2.294507°E");

        let rio = GpsCoordinates {
            latitude: -22.951916,
            longitude: -43.210487,
        };
        assert_eq!(format_coordinates(&rio), "22.951916°S, 43.210487°W");
    }
}
