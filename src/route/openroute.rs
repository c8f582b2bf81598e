use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;

use super::error::ProviderError;
use super::provider::RouteProvider;
use super::types::{RouteRequest, RouteResponse};
use crate::config::ProviderConfig;

pub const DEFAULT_OPENROUTE_URL: &str =
    "https://api.openrouteservice.org/v2/directions/driving-car";

const ACCEPT_TYPES: &str =
    "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8";

/// Directions client for the openrouteservice HTTP API.
pub struct OpenRouteService {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct DirectionsBody {
    coordinates: [[f64; 2]; 2],
    maximum_speed: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    elevation: bool,
}

impl From<&RouteRequest> for DirectionsBody {
    fn from(request: &RouteRequest) -> Self {
        Self {
            coordinates: [request.start.lon_lat(), request.finish.lon_lat()],
            maximum_speed: request.max_speed_kmh,
            elevation: request.include_elevation,
        }
    }
}

impl OpenRouteService {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .resolve_api_key()
            .ok_or(ProviderError::MissingApiKey)?;
        Self::new(config.url.clone(), api_key, config.timeout)
    }
}

impl RouteProvider for OpenRouteService {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        log::debug!(
            "Requesting route {:?} -> {:?} (max {} km/h)",
            request.start.lon_lat(),
            request.finish.lon_lat(),
            request.max_speed_kmh
        );

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, ACCEPT_TYPES)
            .json(&DirectionsBody::from(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn body_uses_lon_lat_order() {
        let request = RouteRequest::new(
            GeoPoint::new(34.0, -118.3),
            GeoPoint::new(34.01, -118.2),
            90,
        );
        let body = serde_json::to_value(DirectionsBody::from(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "coordinates": [[-118.3, 34.0], [-118.2, 34.01]],
                "maximum_speed": 90
            })
        );
    }

    #[test]
    fn body_requests_elevation_when_asked() {
        let request = RouteRequest::new(GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0), 50)
            .with_elevation(true);
        let body = serde_json::to_value(DirectionsBody::from(&request)).unwrap();
        assert_eq!(body["elevation"], serde_json::json!(true));
    }
}
