//! Partitioning of a flat forecast series into calendar days.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{error::ForecastError, model::ForecastSample};

/// Samples that share one calendar date, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub key: String,
    pub date: NaiveDate,
    pub samples: Vec<ForecastSample>,
}

/// Day-keyed view over a forecast series.
///
/// Days iterate in the order their key was first seen; samples inside a day
/// keep their relative input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayGroups {
    days: Vec<DayGroup>,
    rejected: Vec<ForecastError>,
}

impl DayGroups {
    pub fn iter(&self) -> impl Iterator<Item = &DayGroup> {
        self.days.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|d| d.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&[ForecastSample]> {
        self.days.iter().find(|d| d.key == key).map(|d| d.samples.as_slice())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Concatenation of every day's samples, in key order.
    pub fn flatten(&self) -> Vec<ForecastSample> {
        self.days.iter().flat_map(|d| d.samples.iter().cloned()).collect()
    }

    /// Samples skipped because their timestamp had no usable date.
    pub fn rejected(&self) -> &[ForecastError] {
        &self.rejected
    }
}

impl<'a> IntoIterator for &'a DayGroups {
    type Item = &'a DayGroup;
    type IntoIter = std::slice::Iter<'a, DayGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

impl Serialize for DayGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.key, &day.samples)?;
        }
        map.end()
    }
}

/// Group samples by the date portion of their timestamp.
///
/// A sample whose timestamp does not start with a `YYYY-MM-DD` date followed by
/// a space is skipped and logged; the rest of the series is still grouped.
pub fn group_by_day(samples: &[ForecastSample]) -> DayGroups {
    let mut groups = DayGroups::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let (key, date) = match sample.date_key() {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(
                    kind = err.kind(),
                    timestamp = %sample.timestamp,
                    "Skipping forecast sample with unusable timestamp"
                );
                groups.rejected.push(err);
                continue;
            }
        };

        match index.get(key) {
            Some(&pos) => groups.days[pos].samples.push(sample.clone()),
            None => {
                index.insert(key.to_string(), groups.days.len());
                groups.days.push(DayGroup {
                    key: key.to_string(),
                    date,
                    samples: vec![sample.clone()],
                });
            }
        }
    }

    groups
}
