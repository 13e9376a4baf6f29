//! Reverse geocoding of coordinates to a Bihar district.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::districts::{find_best_district, known_variant, strip_district_word};

use super::ApiError;

/// Keyless client-side endpoint of BigDataCloud
const GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Administrative level BigDataCloud uses for Indian districts
const DISTRICT_ADMIN_LEVEL: i64 = 5;

/// Entries at or past this order are at district granularity or finer
const DISTRICT_MIN_ORDER: i64 = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseGeocodeResponse {
    locality: Option<String>,
    city: Option<String>,
    principal_subdivision: Option<String>,
    locality_info: Option<LocalityInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalityInfo {
    #[serde(default)]
    administrative: Vec<AdministrativeArea>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdministrativeArea {
    name: Option<String>,
    admin_level: Option<i64>,
    order: Option<i64>,
}

impl AdministrativeArea {
    fn looks_like_district(&self, name: &str) -> bool {
        self.admin_level == Some(DISTRICT_ADMIN_LEVEL)
            || name.to_lowercase().contains("district")
            || self.order.is_some_and(|o| o >= DISTRICT_MIN_ORDER)
    }
}

impl ReverseGeocodeResponse {
    /// Place names to try, most district-like first.
    fn candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();

        if let Some(info) = &self.locality_info {
            for area in &info.administrative {
                let Some(name) = area.name.as_deref() else {
                    continue;
                };
                if area.looks_like_district(name) {
                    let cleaned = strip_district_word(name).trim().to_string();
                    let preferred = if cleaned.is_empty() { name.to_string() } else { cleaned };
                    candidates.insert(0, preferred);
                } else {
                    candidates.push(name.to_string());
                }
            }
        }

        candidates.extend(
            [&self.locality, &self.city, &self.principal_subdivision]
                .into_iter()
                .flatten()
                .cloned(),
        );
        candidates
    }
}

/// District for a geocoder response, falling back to a scan of the raw body.
fn resolve_district(response: &ReverseGeocodeResponse, raw: &str) -> Option<&'static str> {
    response
        .candidates()
        .iter()
        .filter(|c| !c.trim().is_empty())
        .find_map(|c| known_variant(c).or_else(|| find_best_district(c)))
        .or_else(|| find_best_district(raw))
}

/// Client for BigDataCloud's reverse geocoder.
#[derive(Clone, Debug)]
pub struct GeocodeClient {
    client: Client,
    url: String,
}

impl GeocodeClient {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: GEOCODE_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// District containing the given coordinates, `None` when the location
    /// does not map to a known Bihar district.
    pub async fn locate_district(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<&'static str>, ApiError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("localityLanguage", "en".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let raw = response.text().await?;
        let parsed: ReverseGeocodeResponse = serde_json::from_str(&raw)
            .map_err(|e| ApiError::InvalidResponse(format!("reverse geocode: {}", e)))?;

        let district = resolve_district(&parsed, &raw);
        debug!(latitude, longitude, ?district, "Resolved location");
        Ok(district)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    const GAYA_RESPONSE: &str = r#"{
        "latitude": 24.79,
        "longitude": 85.0,
        "countryName": "India",
        "principalSubdivision": "Bihar",
        "city": "Bodh Gaya",
        "locality": "Bodh Gaya",
        "localityInfo": {
            "administrative": [
                {"name": "India", "order": 2, "adminLevel": 2},
                {"name": "Bihar", "order": 5, "adminLevel": 4},
                {"name": "Magadh Division", "order": 6, "adminLevel": 5},
                {"name": "Gaya District", "order": 7, "adminLevel": 5}
            ]
        }
    }"#;

    fn parse(json: &str) -> ReverseGeocodeResponse {
        serde_json::from_str(json).expect("geocode response should parse")
    }

    #[test]
    fn test_district_like_entries_come_first() {
        let response = parse(GAYA_RESPONSE);
        let candidates = response.candidates();
        assert_eq!(candidates[0], "Gaya");
        assert_eq!(candidates[1], "Magadh Division");
        assert_eq!(candidates.last().map(String::as_str), Some("Bihar"));
    }

    #[test]
    fn test_resolve_gaya() {
        let response = parse(GAYA_RESPONSE);
        assert_eq!(resolve_district(&response, GAYA_RESPONSE), Some("Gaya"));
    }

    #[test]
    fn test_resolve_known_variant() {
        let json = r#"{"locality": "Luckeesarai", "principalSubdivision": "Bihar"}"#;
        assert_eq!(resolve_district(&parse(json), json), Some("Lakhisarai"));
    }

    #[test]
    fn test_resolve_falls_back_to_raw_text() {
        let json = r#"{"locality": "", "plusCode": "near Nalanda University"}"#;
        assert_eq!(resolve_district(&parse(json), json), Some("Nalanda"));
    }

    #[test]
    fn test_resolve_outside_bihar() {
        let json = r#"{"locality": "Chennai", "city": "Chennai", "principalSubdivision": "Tamil Nadu"}"#;
        assert_eq!(resolve_district(&parse(json), json), None);
    }

    #[tokio::test]
    async fn test_locate_district_over_http() {
        let (url, request) = serve_once("200 OK", GAYA_RESPONSE).await;
        let client = GeocodeClient::new(Duration::from_secs(5)).unwrap().with_url(url);

        let district = client.locate_district(24.79, 85.0).await.unwrap();
        assert_eq!(district, Some("Gaya"));

        let request_line = request.await.unwrap();
        assert!(request_line.contains("latitude=24.79"));
        assert!(request_line.contains("localityLanguage=en"));
    }
}
