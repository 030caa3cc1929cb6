//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The location collaborator and the forecast provider abstractions
//! - The one-shot acquisition pipeline
//! - Grouping of forecast samples by calendar day
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod grouping;
pub mod location;
pub mod model;
pub mod provider;

pub use acquisition::{acquire_and_report, acquire_forecast};
pub use config::{Config, LocationConfig};
pub use error::ForecastError;
pub use grouping::{DayGroup, DayGroups, group_by_day};
pub use location::{Authorization, IpLocation, LocationService, StaticLocation};
pub use model::{Acquisition, Coordinate, ForecastPayload, ForecastSample};
pub use provider::{ForecastProvider, OpenWeatherProvider, icon_url, provider_from_config};
