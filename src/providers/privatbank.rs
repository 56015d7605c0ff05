use crate::core::{DailyRateProvider, DateKey, RateError, RawRateRecord};
use async_trait::async_trait;
use tracing::{debug, instrument};

const RATES_PATH: &str = "/p24api/exchange_rates";

/// Client for the PrivatBank archive of daily exchange rates.
pub struct PrivatBankClient {
    base_url: String,
}

impl PrivatBankClient {
    pub fn new(base_url: &str) -> Self {
        PrivatBankClient {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, date: DateKey) -> String {
        format!(
            "{}{}?json&date={}",
            self.base_url,
            RATES_PATH,
            date.request_param()
        )
    }
}

#[async_trait]
impl DailyRateProvider for PrivatBankClient {
    #[instrument(name = "PrivatBankFetch", skip(self, session), fields(date = %date))]
    async fn fetch_rates(
        &self,
        session: &reqwest::Client,
        date: DateKey,
    ) -> Result<RawRateRecord, RateError> {
        let url = self.url_for(date);
        debug!("Requesting rates from {}", url);

        let response = session
            .get(&url)
            .send()
            .await
            .map_err(|source| RateError::Network { date, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::HttpStatus { status, date });
        }

        let body = response
            .text()
            .await
            .map_err(|source| RateError::Network { date, source })?;

        let record =
            serde_json::from_str(&body).map_err(|source| RateError::Fetch { date, source })?;
        debug!("Received {} bytes of rate data", body.len());
        Ok(record)
    }
}
