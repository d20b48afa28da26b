use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::geocoder::{Geocoder, StructuredQuery};

/// The address components that feed geolocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Derived geolocation. The three fields are always all set or all cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_localization: Option<NaiveDate>,
}

impl Geolocation {
    pub fn cleared() -> Self {
        Self::default()
    }

    fn located(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            date_localization: Some(Utc::now().date_naive()),
        }
    }
}

fn part(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

impl Address {
    fn structured_query(&self) -> StructuredQuery {
        let street = [part(&self.street), part(&self.street2)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        StructuredQuery {
            street,
            zip: part(&self.zip_code).to_string(),
            city: part(&self.city).to_string(),
            state: part(&self.state).to_string(),
            country: part(&self.country).to_string(),
        }
    }

    /// Single-line fallback: street, street2, city, state, country (zip omitted).
    pub fn free_text(&self) -> String {
        [
            part(&self.street),
            part(&self.street2),
            part(&self.city),
            part(&self.state),
            part(&self.country),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Resolves coordinates for an address.
///
/// Without street, zip or city nothing is queried and the result is cleared.
/// A structured lookup runs first; a miss falls back to the free-text form.
/// Provider errors clear the result and are logged, never returned.
pub async fn compute_geolocation(
    geocoder: &dyn Geocoder,
    label: &str,
    address: &Address,
) -> Geolocation {
    let query = address.structured_query();
    if query.street.is_empty() && query.zip.is_empty() && query.city.is_empty() {
        info!("Skipping geocode for {label}: insufficient address info {query:?}");
        return Geolocation::cleared();
    }

    info!("Geocoding {label} with params: {query:?}");

    let coords = match geocoder.find_structured(&query).await {
        Ok(Some(coords)) => Some(coords),
        Ok(None) => {
            let text = address.free_text();
            info!("Structured geocode failed for {label}, trying fallback with address string: {text}");
            match geocoder.find_text(&text).await {
                Ok(coords) => coords,
                Err(e) => {
                    error!("Geocode error for {label}: {e}");
                    return Geolocation::cleared();
                }
            }
        }
        Err(e) => {
            error!("Geocode error for {label}: {e}");
            return Geolocation::cleared();
        }
    };

    match coords {
        Some((latitude, longitude)) => {
            info!("Geocoded {label}: latitude={latitude}, longitude={longitude}");
            Geolocation::located(latitude, longitude)
        }
        None => {
            error!("Geocode failed for {label}: {query:?}");
            Geolocation::cleared()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::geocoder::GeocodeError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted geocoder that records every lookup.
    struct FakeGeocoder {
        structured: Result<Option<(f64, f64)>, u16>,
        text: Result<Option<(f64, f64)>, u16>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeGeocoder {
        fn new(
            structured: Result<Option<(f64, f64)>, u16>,
            text: Result<Option<(f64, f64)>, u16>,
        ) -> Self {
            Self {
                structured,
                text,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn find_structured(
            &self,
            query: &StructuredQuery,
        ) -> Result<Option<(f64, f64)>, GeocodeError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("structured:{}", query.city));
            self.structured.map_err(GeocodeError::Status)
        }

        async fn find_text(&self, address: &str) -> Result<Option<(f64, f64)>, GeocodeError> {
            self.calls.lock().unwrap().push(format!("text:{address}"));
            self.text.map_err(GeocodeError::Status)
        }
    }

    fn pune_address() -> Address {
        Address {
            street: Some("12 MG Road".into()),
            street2: Some("Camp".into()),
            city: Some("Pune".into()),
            zip_code: Some("411001".into()),
            state: Some("Maharashtra".into()),
            country: Some("India".into()),
        }
    }

    #[tokio::test]
    async fn test_no_address_skips_provider() {
        let geocoder = FakeGeocoder::new(Ok(Some((1.0, 2.0))), Ok(None));
        let address = Address {
            state: Some("Maharashtra".into()),
            ..Default::default()
        };
        let geo = compute_geolocation(&geocoder, "plot", &address).await;
        assert_eq!(geo, Geolocation::cleared());
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_structured_hit_sets_all_fields() {
        let geocoder = FakeGeocoder::new(Ok(Some((18.52, 73.85))), Ok(None));
        let geo = compute_geolocation(&geocoder, "plot", &pune_address()).await;
        assert_eq!(geo.latitude, Some(18.52));
        assert_eq!(geo.longitude, Some(73.85));
        assert!(geo.date_localization.is_some());
        assert_eq!(geocoder.calls(), vec!["structured:Pune".to_string()]);
    }

    #[tokio::test]
    async fn test_structured_miss_falls_back_to_free_text() {
        let geocoder = FakeGeocoder::new(Ok(None), Ok(Some((18.5, 73.8))));
        let geo = compute_geolocation(&geocoder, "plot", &pune_address()).await;
        assert_eq!(geo.latitude, Some(18.5));
        assert_eq!(
            geocoder.calls(),
            vec![
                "structured:Pune".to_string(),
                "text:12 MG Road, Camp, Pune, Maharashtra, India".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_provider_error_clears() {
        let geocoder = FakeGeocoder::new(Err(500), Ok(Some((1.0, 1.0))));
        let geo = compute_geolocation(&geocoder, "plot", &pune_address()).await;
        assert_eq!(geo, Geolocation::cleared());
    }

    #[tokio::test]
    async fn test_both_misses_clear() {
        let geocoder = FakeGeocoder::new(Ok(None), Ok(None));
        let geo = compute_geolocation(&geocoder, "plot", &pune_address()).await;
        assert_eq!(geo, Geolocation::cleared());
    }

    #[test]
    fn test_free_text_skips_blank_parts() {
        let address = Address {
            street: Some("  ".into()),
            city: Some("Nashik".into()),
            country: Some("India".into()),
            ..Default::default()
        };
        assert_eq!(address.free_text(), "Nashik, India");
    }
}
