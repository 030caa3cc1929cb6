use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, Coordinate, IpLocation, LocationConfig, LocationService, StaticLocation,
    acquire_and_report, group_by_day, provider_from_config,
};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Text};

use crate::{
    consent::ConsentGate,
    locale::DisplayLocale,
    render::{JsonReport, TextReport},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Multi-day forecast for where you are")]
pub struct Cli {
    /// Log pipeline steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, language and location preferences.
    Configure,

    /// Show current conditions and the forecast grouped by day.
    Show {
        /// Latitude in decimal degrees; requires --lon.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees; requires --lat.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Override the configured language, e.g. "fr" or "en".
        #[arg(long)]
        lang: Option<String>,

        /// Allow the location lookup without asking.
        #[arg(short, long)]
        yes: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, lang, yes, json } => {
                let mut config = Config::load()?;
                if let Some(lang) = lang {
                    config.lang = lang;
                }
                let fixed = lat.zip(lon).map(|(lat, lon)| Coordinate::new(lat, lon));
                show(&config, fixed, yes, json).await
            }
        }
    }
}

fn location_service(
    config: &Config,
    fixed: Option<Coordinate>,
    yes: bool,
) -> anyhow::Result<Box<dyn LocationService>> {
    if let Some(coordinate) = fixed {
        tracing::debug!(%coordinate, "Using coordinate from the command line");
        return Ok(Box::new(StaticLocation::new(coordinate)));
    }
    if let Some(coordinate) = config.fixed_location() {
        tracing::debug!(%coordinate, "Using coordinate from the config file");
        return Ok(Box::new(StaticLocation::new(coordinate)));
    }

    let preapproved = yes || config.location_consent;
    tracing::debug!(preapproved, "Looking up location from the IP address");
    let ip = IpLocation::new(true, config.timeout())?;
    Ok(Box::new(ConsentGate::new(ip, preapproved)))
}

async fn show(
    config: &Config,
    fixed: Option<Coordinate>,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let location = location_service(config, fixed, yes)?;

    let Some(acquisition) = acquire_and_report(location.as_ref(), provider.as_ref()).await else {
        bail!("No forecast available; see the log above for the cause");
    };

    let days = group_by_day(&acquisition.payload.samples);

    if json {
        let report = JsonReport { acquisition: &acquisition, days: &days };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize forecast")?
        );
    } else {
        let report = TextReport::new(&acquisition, &days, DisplayLocale::from_lang(&config.lang));
        print!("{report}");
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt cancelled")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    config.lang = Text::new("Language (e.g. fr, en):")
        .with_default(&config.lang)
        .prompt()
        .context("Language prompt cancelled")?;

    let fix_location = Confirm::new("Use a fixed location instead of looking it up?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Location prompt cancelled")?;

    if fix_location {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a decimal number")
            .prompt()
            .context("Latitude prompt cancelled")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a decimal number")
            .prompt()
            .context("Longitude prompt cancelled")?;
        config.location = Some(LocationConfig { latitude, longitude });
    } else {
        config.location = None;
        config.location_consent =
            Confirm::new("Allow looking up your approximate location from your IP address?")
                .with_default(config.location_consent)
                .prompt()
                .context("Consent prompt cancelled")?;
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
