//! The JSON document persisted at the end of a run.
//!
//! The document is an array with one element per fetched day, each element a
//! single-key object mapping the date to that day's rates:
//!
//! ```json
//! [
//!   { "2025-01-07": { "USD": { "purchase": 41.8, "sale": 42.3 } } }
//! ]
//! ```

use super::error::RateError;
use super::rates::{CurrencyCode, CurrencyRate, DateKey, DayResult};
use anyhow::{Context, Result};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputRate {
    #[serde(default)]
    pub purchase: Option<f64>,
    #[serde(default)]
    pub sale: Option<f64>,
}

impl From<CurrencyRate> for OutputRate {
    fn from(rate: CurrencyRate) -> Self {
        OutputRate {
            purchase: rate.purchase_rate,
            sale: rate.sale_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub date: DateKey,
    pub rates: BTreeMap<CurrencyCode, OutputRate>,
}

impl From<&DayResult> for DayEntry {
    fn from(day: &DayResult) -> Self {
        DayEntry {
            date: day.date,
            rates: day
                .rates
                .iter()
                .map(|(code, rate)| (*code, OutputRate::from(*rate)))
                .collect(),
        }
    }
}

impl Serialize for DayEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.rates)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for DayEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<DateKey, BTreeMap<CurrencyCode, OutputRate>>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(D::Error::custom(format!(
                "expected exactly one date per entry, found {}",
                map.len()
            )));
        }
        let (date, rates) = map
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("empty day entry"))?;
        Ok(DayEntry { date, rates })
    }
}

/// Days in fetch order, today first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputDocument {
    pub days: Vec<DayEntry>,
}

impl OutputDocument {
    pub fn from_results(results: &[DayResult]) -> Self {
        OutputDocument {
            days: results.iter().map(DayEntry::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the document as indented UTF-8 JSON, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), RateError> {
        let path = path.as_ref();
        let json = self.to_json().map_err(|e| RateError::Output {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        fs::write(path, json).map_err(|source| RateError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(days = self.days.len(), "Wrote {}", path.display());
        Ok(())
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read output file: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse output file: {}", path.display()))
    }
}
