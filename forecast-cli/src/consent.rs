use async_trait::async_trait;
use forecast_core::{Authorization, Coordinate, ForecastError, LocationService};
use inquire::Confirm;

/// Asks the user before the wrapped service may look up their position.
#[derive(Debug)]
pub struct ConsentGate<L> {
    inner: L,
    preapproved: bool,
    ask: fn() -> bool,
}

impl<L: LocationService> ConsentGate<L> {
    pub fn new(inner: L, preapproved: bool) -> Self {
        Self::with_prompt(inner, preapproved, ask)
    }

    pub fn with_prompt(inner: L, preapproved: bool, ask: fn() -> bool) -> Self {
        Self { inner, preapproved, ask }
    }
}

fn ask() -> bool {
    Confirm::new("Allow forecast to look up your approximate location?")
        .with_default(true)
        .with_help_message("Answer once for good with `forecast configure`, or pass --yes")
        .prompt()
        .unwrap_or(false)
}

#[async_trait]
impl<L: LocationService> LocationService for ConsentGate<L> {
    async fn request_authorization(&self) -> Authorization {
        if self.preapproved {
            tracing::debug!("Location lookup pre-approved");
            return self.inner.request_authorization().await;
        }

        // A cancelled or non-interactive prompt counts as a refusal.
        let consent = tokio::task::spawn_blocking(self.ask).await.unwrap_or(false);
        if !consent {
            tracing::info!("User declined the location lookup");
            return Authorization::Denied;
        }

        self.inner.request_authorization().await
    }

    async fn current_position(&self) -> Result<Coordinate, ForecastError> {
        self.inner.current_position().await
    }
}
