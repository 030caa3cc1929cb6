use thiserror::Error;

/// Failures of the acquisition pipeline and of day grouping.
///
/// Every acquisition variant is terminal for the attempt that produced it;
/// nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed forecast response: {0}")]
    MalformedResponse(String),

    #[error("Invalid forecast timestamp '{timestamp}'")]
    InvalidTimestamp { timestamp: String },
}

impl ForecastError {
    /// Stable short name, used as a structured field when reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::PermissionDenied => "permission_denied",
            ForecastError::LocationUnavailable(_) => "location_unavailable",
            ForecastError::Network(_) => "network_error",
            ForecastError::MalformedResponse(_) => "malformed_response",
            ForecastError::InvalidTimestamp { .. } => "invalid_timestamp",
        }
    }

    pub fn invalid_timestamp(timestamp: impl Into<String>) -> Self {
        ForecastError::InvalidTimestamp { timestamp: timestamp.into() }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForecastError::Network(format!("request timed out: {err}"))
        } else {
            ForecastError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::MalformedResponse(err.to_string())
    }
}
