use crate::{Config, Coordinate, ForecastError, ForecastPayload, config::API_KEY_ENV};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::{OpenWeatherProvider, icon_url};

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, at: &Coordinate) -> Result<ForecastPayload, ForecastError>;
}

/// Construct the forecast provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    provider_with_env_key(config, std::env::var(API_KEY_ENV).ok())
}

fn provider_with_env_key(
    config: &Config,
    env_key: Option<String>,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = config.require_api_key_with_override(env_key)?;

    let provider =
        OpenWeatherProvider::new(api_key, config.lang.clone(), config.timeout())?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_when_missing_api_key() {
        let err = provider_with_env_key(&Config::default(), None).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("forecast configure"));
    }

    #[test]
    fn provider_accepts_key_from_environment_alone() {
        assert!(provider_with_env_key(&Config::default(), Some("ENV_KEY".into())).is_ok());
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
