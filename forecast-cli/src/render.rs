use std::fmt;

use forecast_core::{Acquisition, DayGroups, ForecastSample, icon_url};
use serde::Serialize;

use crate::locale::{DisplayLocale, capitalize_first};

/// Machine-readable form of everything `show` prints.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub acquisition: &'a Acquisition,
    pub days: &'a DayGroups,
}

struct Labels {
    humidity: &'static str,
    wind: &'static str,
}

fn labels(locale: DisplayLocale) -> Labels {
    match locale {
        DisplayLocale::French => Labels { humidity: "Humidité", wind: "Vent" },
        DisplayLocale::English => Labels { humidity: "Humidity", wind: "Wind" },
    }
}

fn hour_label(sample: &ForecastSample) -> String {
    sample
        .time_of_day()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| sample.timestamp.clone())
}

/// Human-readable form of everything `show` prints.
pub struct TextReport<'a> {
    acquisition: &'a Acquisition,
    days: &'a DayGroups,
    locale: DisplayLocale,
}

impl<'a> TextReport<'a> {
    pub fn new(acquisition: &'a Acquisition, days: &'a DayGroups, locale: DisplayLocale) -> Self {
        Self { acquisition, days, locale }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = labels(self.locale);
        let payload = &self.acquisition.payload;

        writeln!(f, "{}", payload.city_name)?;

        if let Some(now) = payload.current() {
            writeln!(f, "{}°C  {}", now.temperature, capitalize_first(&now.condition_description))?;
            writeln!(f, "{}", icon_url(&now.condition_icon_code))?;
            writeln!(f, "{}: {}%", labels.humidity, now.humidity)?;
            writeln!(f, "{}: {} m/s", labels.wind, now.wind_speed)?;
            writeln!(f, "Min: {}°C  Max: {}°C", now.temperature_min, now.temperature_max)?;
        }

        for day in self.days {
            writeln!(f)?;
            writeln!(f, "{}", self.locale.day_heading(day.date))?;
            for sample in &day.samples {
                writeln!(
                    f,
                    "  {}  {:>6}°C  {}  {}",
                    hour_label(sample),
                    sample.temperature,
                    capitalize_first(&sample.condition_description),
                    icon_url(&sample.condition_icon_code),
                )?;
            }
        }

        Ok(())
    }
}
