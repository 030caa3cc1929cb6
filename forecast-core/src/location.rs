//! Where the forecast is for.
//!
//! A [`LocationService`] first asks for authorization and then produces a single
//! position fix. Desktop machines rarely have a positioning device, so besides a
//! fixed coordinate the crate ships an IP-based lookup.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ForecastError, model::Coordinate};

const IP_LOCATION_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
}

impl Authorization {
    pub fn from_consent(consent: bool) -> Self {
        if consent { Authorization::Granted } else { Authorization::Denied }
    }

    pub fn is_granted(self) -> bool {
        self == Authorization::Granted
    }
}

#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    async fn request_authorization(&self) -> Authorization;

    /// One position fix, no tracking.
    async fn current_position(&self) -> Result<Coordinate, ForecastError>;
}

/// A coordinate the user already gave us.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation {
    coordinate: Coordinate,
}

impl StaticLocation {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationService for StaticLocation {
    async fn request_authorization(&self) -> Authorization {
        Authorization::Granted
    }

    async fn current_position(&self) -> Result<Coordinate, ForecastError> {
        Ok(self.coordinate)
    }
}

/// Approximate position from the public IP address (ip-api.com).
#[derive(Debug, Clone)]
pub struct IpLocation {
    http: Client,
    url: String,
    consent: bool,
}

impl IpLocation {
    pub fn new(consent: bool, timeout: Duration) -> Result<Self, ForecastError> {
        Self::with_url(IP_LOCATION_URL, consent, timeout)
    }

    pub fn with_url(
        url: impl Into<String>,
        consent: bool,
        timeout: Duration,
    ) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url: url.into(), consent })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationService for IpLocation {
    async fn request_authorization(&self) -> Authorization {
        Authorization::from_consent(self.consent)
    }

    async fn current_position(&self) -> Result<Coordinate, ForecastError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| ForecastError::LocationUnavailable(format!("lookup failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::LocationUnavailable(format!(
                "lookup returned status {status}"
            )));
        }

        let parsed: IpApiResponse = res.json().await.map_err(|e| {
            ForecastError::LocationUnavailable(format!("unreadable lookup response: {e}"))
        })?;

        if parsed.status != "success" {
            return Err(ForecastError::LocationUnavailable(
                parsed.message.unwrap_or_else(|| "lookup was not successful".to_string()),
            ));
        }

        match (parsed.lat, parsed.lon) {
            (Some(lat), Some(lon)) => {
                tracing::debug!(lat, lon, "Resolved position from IP address");
                Ok(Coordinate::new(lat, lon))
            }
            _ => Err(ForecastError::LocationUnavailable(
                "lookup response carried no coordinates".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ip_location(server: &MockServer, consent: bool) -> IpLocation {
        IpLocation::with_url(format!("{}/json", server.uri()), consent, Duration::from_secs(2))
            .expect("client builds")
    }

    #[tokio::test]
    async fn static_location_is_always_granted() {
        let loc = StaticLocation::new(Coordinate::new(45.0, 5.0));
        assert_eq!(loc.request_authorization().await, Authorization::Granted);
        assert_eq!(loc.current_position().await, Ok(Coordinate::new(45.0, 5.0)));
    }

    #[tokio::test]
    async fn ip_location_authorization_follows_consent() {
        let server = MockServer::start().await;
        assert!(ip_location(&server, true).request_authorization().await.is_granted());
        assert!(!ip_location(&server, false).request_authorization().await.is_granted());
    }

    #[tokio::test]
    async fn ip_location_reads_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .and(query_param("fields", "status,message,lat,lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 43.6,
                "lon": 1.44
            })))
            .mount(&server)
            .await;

        let pos = ip_location(&server, true).current_position().await;
        assert_eq!(pos, Ok(Coordinate::new(43.6, 1.44)));
    }

    #[tokio::test]
    async fn ip_location_failure_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "reserved range"
            })))
            .mount(&server)
            .await;

        let err = ip_location(&server, true).current_position().await.unwrap_err();
        assert_eq!(err, ForecastError::LocationUnavailable("reserved range".into()));
    }

    #[tokio::test]
    async fn ip_location_http_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = ip_location(&server, true).current_position().await.unwrap_err();
        assert_eq!(err.kind(), "location_unavailable");
    }
}
