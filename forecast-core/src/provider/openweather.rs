use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ForecastError,
    model::{Coordinate, ForecastPayload, ForecastSample},
};

use super::ForecastProvider;

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const ICON_URL_TEMPLATE: &str = "http://openweathermap.org/img/w/{code}.png";

/// Display URL for an OpenWeather condition icon code such as `"10d"`.
pub fn icon_url(code: &str) -> String {
    ICON_URL_TEMPLATE.replace("{code}", code)
}

/// 5 day / 3 hour forecast from OpenWeather, always in metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    lang: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, lang: String, timeout: Duration) -> Result<Self, ForecastError> {
        Self::with_base_url(api_key, lang, timeout, OPENWEATHER_BASE_URL)
    }

    pub fn with_base_url(
        api_key: String,
        lang: String,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            lang,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/data/2.5/forecast", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwForecastEntry> for ForecastSample {
    type Error = ForecastError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let condition = entry.weather.into_iter().next().ok_or_else(|| {
            ForecastError::MalformedResponse(format!(
                "forecast entry {} has no weather condition",
                entry.dt_txt
            ))
        })?;

        Ok(ForecastSample {
            timestamp: entry.dt_txt,
            temperature: entry.main.temp,
            temperature_min: entry.main.temp_min,
            temperature_max: entry.main.temp_max,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition_description: condition.description,
            condition_icon_code: condition.icon,
        })
    }
}

fn parse_forecast(body: &str) -> Result<ForecastPayload, ForecastError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    let samples = parsed
        .list
        .into_iter()
        .map(ForecastSample::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForecastPayload { city_name: parsed.city.name, samples })
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, at: &Coordinate) -> Result<ForecastPayload, ForecastError> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        tracing::debug!(%at, lang = %self.lang, "Requesting OpenWeather forecast");

        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ForecastError::Network(format!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let payload = parse_forecast(&body)?;
        tracing::info!(
            city = %payload.city_name,
            samples = payload.samples.len(),
            "Received OpenWeather forecast"
        );

        Ok(payload)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
