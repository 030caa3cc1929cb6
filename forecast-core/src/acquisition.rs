//! The one-shot pipeline: authorization, position fix, forecast fetch.

use crate::{
    error::ForecastError,
    location::LocationService,
    model::Acquisition,
    provider::ForecastProvider,
};

/// Run the acquisition pipeline once.
///
/// Each step short-circuits the rest: a denied authorization never reads the
/// position, and a failed position never reaches the network.
pub async fn acquire_forecast(
    location: &dyn LocationService,
    provider: &dyn ForecastProvider,
) -> Result<Acquisition, ForecastError> {
    if !location.request_authorization().await.is_granted() {
        return Err(ForecastError::PermissionDenied);
    }
    tracing::debug!("Location authorization granted");

    let coordinate = location.current_position().await?;
    tracing::debug!(%coordinate, "Acquired position fix");

    let payload = provider.fetch_forecast(&coordinate).await?;

    Ok(Acquisition { coordinate, payload })
}

/// Like [`acquire_forecast`], but failures are logged instead of returned.
pub async fn acquire_and_report(
    location: &dyn LocationService,
    provider: &dyn ForecastProvider,
) -> Option<Acquisition> {
    match acquire_forecast(location, provider).await {
        Ok(acquisition) => {
            tracing::info!(
                city = %acquisition.payload.city_name,
                samples = acquisition.payload.samples.len(),
                "Forecast acquired"
            );
            Some(acquisition)
        }
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "Forecast acquisition failed");
            None
        }
    }
}
