//! Address enrichment gate: resolves the address triple entered on the
//! first page into coordinates before the wizard may advance.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GeocodingConfig;

use super::domain::{AnswerRecord, GeoPoint, StateCode};

/// Free-text address query assembled from the Basic Info page.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressQuery {
    pub line: String,
    pub city: String,
    pub state: Option<StateCode>,
    pub zipcode: String,
}

impl AddressQuery {
    pub fn from_record(record: &AnswerRecord) -> Self {
        Self {
            line: record.address_line.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            zipcode: record.zipcode.clone(),
        }
    }

    /// Join the non-empty pieces into the search string handed to the
    /// geocoder, e.g. `123 Grand Ave, Des Moines, IA 50309`.
    pub fn free_text(&self) -> String {
        let mut region = match &self.state {
            Some(state) => state.as_str().to_string(),
            None => String::new(),
        };
        if !self.zipcode.trim().is_empty() {
            if !region.is_empty() {
                region.push(' ');
            }
            region.push_str(self.zipcode.trim());
        }

        [self.line.trim(), self.city.trim(), region.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The three lookup failure modes. They are distinguishable for logging
/// and tests but share one user-facing error class.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("lookup request failed: {0}")]
    Transport(String),
    #[error("address not found")]
    NotFound,
    #[error("invalid geocode response: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// All failure modes block the step with the same message class.
    pub fn user_message(&self) -> String {
        format!("address could not be verified: {self}")
    }
}

/// Boundary to the external geocoding service so the wizard can be
/// exercised without network access.
#[async_trait]
pub trait GeocodeGateway: Send + Sync {
    async fn resolve(&self, query: &AddressQuery) -> Result<GeoPoint, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Client for a Nominatim-compatible address search endpoint. The response
/// is a JSON array; only the first element's `lat`/`lon` are used.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    endpoint: String,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mentor-match/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;
        Ok(Self { endpoint, client })
    }

    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }
}

#[async_trait]
impl GeocodeGateway for NominatimClient {
    async fn resolve(&self, query: &AddressQuery) -> Result<GeoPoint, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query.free_text().as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Transport(format!(
                "geocoder answered {status}"
            )));
        }

        let hits: Vec<GeocodeHit> = response
            .json()
            .await
            .map_err(|err| GeocodeError::InvalidResponse(err.to_string()))?;

        let hit = hits.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("latitude '{}'", hit.lat)))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("longitude '{}'", hit.lon)))?;

        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_joins_non_empty_parts() {
        let query = AddressQuery {
            line: "123 Grand Ave".to_string(),
            city: "Des Moines".to_string(),
            state: Some(StateCode::parse("ia").expect("valid state")),
            zipcode: "50309".to_string(),
        };
        assert_eq!(query.free_text(), "123 Grand Ave, Des Moines, IA 50309");
    }

    #[test]
    fn free_text_skips_missing_parts() {
        let query = AddressQuery {
            line: String::new(),
            city: "Ames".to_string(),
            state: None,
            zipcode: String::new(),
        };
        assert_eq!(query.free_text(), "Ames");
    }

    #[test]
    fn failure_modes_share_one_user_facing_class() {
        for error in [
            GeocodeError::Transport("connection refused".to_string()),
            GeocodeError::NotFound,
            GeocodeError::InvalidResponse("bad json".to_string()),
        ] {
            assert!(error
                .user_message()
                .starts_with("address could not be verified"));
        }
    }
}
