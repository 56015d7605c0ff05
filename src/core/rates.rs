//! Exchange rate abstractions and core types

use super::error::RateError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Largest number of days a single run may request.
pub const MAX_DAYS: i64 = 10;

/// Unvalidated provider response body for one date.
pub type RawRateRecord = serde_json::Value;

/// Calendar date used to key results and to build requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub const KEY_FORMAT: &'static str = "%Y-%m-%d";
    pub const REQUEST_FORMAT: &'static str = "%d.%m.%Y";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Date in the `DD.MM.YYYY` form the provider expects.
    pub fn request_param(&self) -> String {
        self.0.format(Self::REQUEST_FORMAT).to_string()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, Self::KEY_FORMAT).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CurrencyCode {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Usd => "USD",
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(CurrencyCode::Usd),
            "EUR" => Ok(CurrencyCode::Eur),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// Bank purchase and sale rate for one currency. `None` means the provider
/// did not publish the value, which is not the same as a zero rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrencyRate {
    pub purchase_rate: Option<f64>,
    pub sale_rate: Option<f64>,
}

pub type DayRates = BTreeMap<CurrencyCode, CurrencyRate>;

/// Rates fetched for one day. Days that failed have no `DayResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResult {
    pub date: DateKey,
    pub rates: DayRates,
}

#[async_trait]
pub trait DailyRateProvider: Send + Sync {
    /// Fetches the raw rate record published for `date`, reusing `session`.
    async fn fetch_rates(
        &self,
        session: &reqwest::Client,
        date: DateKey,
    ) -> Result<RawRateRecord, RateError>;
}
