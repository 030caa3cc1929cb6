use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Format of provider timestamps, e.g. `2024-03-01 09:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the date prefix used as a grouping key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One timestamped reading of a multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: String,
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition_description: String,
    pub condition_icon_code: String,
}

impl ForecastSample {
    /// Date portion of the timestamp: everything before the first space.
    ///
    /// The prefix must itself be a calendar date, otherwise the sample cannot
    /// be placed in a day.
    pub fn date_key(&self) -> Result<(&str, NaiveDate), ForecastError> {
        let (prefix, _) = self
            .timestamp
            .split_once(' ')
            .ok_or_else(|| ForecastError::invalid_timestamp(&self.timestamp))?;

        let date = NaiveDate::parse_from_str(prefix, DATE_KEY_FORMAT)
            .map_err(|_| ForecastError::invalid_timestamp(&self.timestamp))?;

        Ok((prefix, date))
    }

    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .ok()
            .map(|dt| dt.time())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub city_name: String,
    pub samples: Vec<ForecastSample>,
}

impl ForecastPayload {
    /// The sample shown as "current conditions": the earliest one.
    pub fn current(&self) -> Option<&ForecastSample> {
        self.samples.first()
    }
}

/// Result of one successful acquisition.
///
/// Produced once, then handed read-only to grouping and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub coordinate: Coordinate,
    pub payload: ForecastPayload,
}

#[cfg(test)]
pub(crate) fn sample(timestamp: &str) -> ForecastSample {
    ForecastSample {
        timestamp: timestamp.to_string(),
        temperature: 12.5,
        temperature_min: 10.0,
        temperature_max: 14.0,
        humidity: 70,
        wind_speed: 3.2,
        condition_description: "ciel dégagé".to_string(),
        condition_icon_code: "01d".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_is_prefix_before_first_space() {
        let s = sample("2024-03-01 09:00:00");
        let (key, date) = s.date_key().expect("valid timestamp");

        assert_eq!(key, "2024-03-01");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn date_key_rejects_timestamp_without_space() {
        let err = sample("2024-03-01T09:00:00").date_key().unwrap_err();
        assert_eq!(err, ForecastError::invalid_timestamp("2024-03-01T09:00:00"));
    }

    #[test]
    fn date_key_rejects_non_date_prefix() {
        assert!(sample("tomorrow 09:00:00").date_key().is_err());
        assert!(sample("2024-02-30 09:00:00").date_key().is_err());
        assert!(sample("").date_key().is_err());
    }

    #[test]
    fn time_of_day_parses_full_timestamp() {
        let t = sample("2024-03-01 15:00:00").time_of_day();
        assert_eq!(t, NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(sample("2024-03-01").time_of_day(), None);
    }

    #[test]
    fn current_is_first_sample() {
        let payload = ForecastPayload {
            city_name: "Paris".into(),
            samples: vec![sample("2024-03-01 09:00:00"), sample("2024-03-01 12:00:00")],
        };
        assert_eq!(payload.current().unwrap().timestamp, "2024-03-01 09:00:00");

        let empty = ForecastPayload { city_name: "Paris".into(), samples: vec![] };
        assert!(empty.current().is_none());
    }

    #[test]
    fn coordinate_display_uses_four_decimals() {
        assert_eq!(Coordinate::new(48.856_613, 2.352_222).to_string(), "48.8566, 2.3522");
    }
}
