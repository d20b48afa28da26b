//! Geocoding provider client (Nominatim-compatible search API).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoder returned status {0}")]
    Status(u16),

    #[error("Geocoder returned an invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Structured address query. Empty parts are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredQuery {
    pub street: String,
    pub zip: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

/// External geocoding collaborator.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up a structured address. `Ok(None)` means no match.
    async fn find_structured(
        &self,
        query: &StructuredQuery,
    ) -> Result<Option<(f64, f64)>, GeocodeError>;

    /// Looks up a single free-text address string. `Ok(None)` means no match.
    async fn find_text(&self, address: &str) -> Result<Option<(f64, f64)>, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: String, user_agent: String) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url,
            user_agent,
        })
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Option<(f64, f64)>, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("format", "jsonv2"), ("limit", "1")])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        debug!("Geocoder returned {} hit(s)", hits.len());

        match hits.first() {
            None => Ok(None),
            Some(hit) => {
                let lat = hit
                    .lat
                    .parse::<f64>()
                    .map_err(|_| GeocodeError::InvalidCoordinate(hit.lat.clone()))?;
                let lon = hit
                    .lon
                    .parse::<f64>()
                    .map_err(|_| GeocodeError::InvalidCoordinate(hit.lon.clone()))?;
                Ok(Some((lat, lon)))
            }
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn find_structured(
        &self,
        query: &StructuredQuery,
    ) -> Result<Option<(f64, f64)>, GeocodeError> {
        let params: Vec<(&str, &str)> = [
            ("street", query.street.as_str()),
            ("postalcode", query.zip.as_str()),
            ("city", query.city.as_str()),
            ("state", query.state.as_str()),
            ("country", query.country.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .collect();

        self.search(&params).await
    }

    async fn find_text(&self, address: &str) -> Result<Option<(f64, f64)>, GeocodeError> {
        self.search(&[("q", address)]).await
    }
}
