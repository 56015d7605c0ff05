use crate::core::{
    CurrencyCode, CurrencyRate, DailyRateProvider, DateKey, DayRates, DayResult, MAX_DAYS,
    RateError, RawRateRecord,
};
use crate::providers::open_session;
use chrono::{Duration, Local, NaiveDate};
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives a [`DailyRateProvider`] over a window of recent days.
pub struct RateService {
    provider: Arc<dyn DailyRateProvider>,
    concurrency: usize,
}

impl RateService {
    pub fn new(provider: Arc<dyn DailyRateProvider>) -> Self {
        RateService {
            provider,
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` day requests in flight. Results keep
    /// descending date order regardless.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Rates for today and the `days - 1` days before it, newest first.
    /// Failed days are reported on stderr and left out.
    pub async fn get_rates_for_days(&self, days: i64) -> Result<Vec<DayResult>, RateError> {
        let today = Local::now().date_naive();
        self.get_rates_for_days_from(today, days, &mut std::io::stderr())
            .await
    }

    /// Same as [`get_rates_for_days`](Self::get_rates_for_days) with an explicit
    /// `today` and a sink for the per-day `Error: ...` lines.
    pub async fn get_rates_for_days_from<W: Write>(
        &self,
        today: NaiveDate,
        days: i64,
        diagnostics: &mut W,
    ) -> Result<Vec<DayResult>, RateError> {
        validate_days(days)?;

        // Dropped on every return path below, which closes pooled connections.
        let session = open_session()?;
        let session = &session;
        let provider = self.provider.as_ref();

        info!(days, %today, concurrency = self.concurrency, "Fetching exchange rates");

        let mut fetches = stream::iter(0..days)
            .map(move |offset| {
                let date = DateKey::new(today - Duration::days(offset));
                async move { (date, fetch_day(provider, session, date).await) }
            })
            .buffered(self.concurrency);

        let mut results = Vec::with_capacity(days as usize);
        while let Some((date, outcome)) = fetches.next().await {
            match outcome {
                Ok(rates) => {
                    debug!(%date, currencies = rates.len(), "Fetched day");
                    results.push(DayResult { date, rates });
                }
                Err(e) if e.is_per_day() => {
                    warn!(%date, error = %e, "Skipping day");
                    if let Err(write_err) = writeln!(diagnostics, "Error: {e}") {
                        warn!(error = %write_err, "Failed to write diagnostic line");
                    }
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            fetched = results.len(),
            failed = days as usize - results.len(),
            "Finished fetching"
        );
        Ok(results)
    }
}

pub fn validate_days(days: i64) -> Result<(), RateError> {
    if (1..=MAX_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(RateError::InvalidArgument(days))
    }
}

async fn fetch_day(
    provider: &dyn DailyRateProvider,
    session: &reqwest::Client,
    date: DateKey,
) -> Result<DayRates, RateError> {
    let record = provider.fetch_rates(session, date).await?;
    extract_usd_eur(date, &record)
}

/// Picks the USD and EUR entries out of the raw record fetched for `date`.
///
/// A record without `exchangeRate` yields an empty map; an `exchangeRate`
/// that is present but not a list (`null` included) is an error. Entries for
/// other currencies, or without a currency code, are ignored. Missing, null or
/// non-numeric rates stay `None`.
pub fn extract_usd_eur(date: DateKey, record: &RawRateRecord) -> Result<DayRates, RateError> {
    let unreadable = |reason: String| RateError::Extraction { date, reason };

    let object = record
        .as_object()
        .ok_or_else(|| unreadable(format!("expected an object, got {}", json_kind(record))))?;

    let entries = match object.get("exchangeRate") {
        None => return Ok(DayRates::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(unreadable(format!(
                "exchangeRate should be a list, got {}",
                json_kind(other)
            )));
        }
    };

    let mut rates = DayRates::new();
    for entry in entries {
        let entry = entry.as_object().ok_or_else(|| {
            unreadable(format!(
                "exchangeRate entry should be an object, got {}",
                json_kind(entry)
            ))
        })?;

        let Some(code) = entry
            .get("currency")
            .and_then(Value::as_str)
            .and_then(|c| c.parse::<CurrencyCode>().ok())
        else {
            continue;
        };

        rates.insert(
            code,
            CurrencyRate {
                purchase_rate: rate_field(date, code, entry, "purchaseRate"),
                sale_rate: rate_field(date, code, entry, "saleRate"),
            },
        );
    }
    Ok(rates)
}

fn rate_field(
    date: DateKey,
    code: CurrencyCode,
    entry: &Map<String, Value>,
    field: &str,
) -> Option<f64> {
    match entry.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let rate = value.as_f64();
            if rate.is_none() {
                warn!(%date, %code, %value, "{field} is not a number, treating as missing");
            }
            rate
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
