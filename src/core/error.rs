//! Error kinds raised while fetching and persisting exchange rates

use super::rates::{DateKey, MAX_DAYS};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateError {
    /// Day count outside the supported window. Raised before any I/O.
    #[error("number of days must be between 1 and {max}, got {0}", max = MAX_DAYS)]
    InvalidArgument(i64),

    /// The day count entered by the user is not an integer.
    #[error("'{input}' is not a whole number of days")]
    InvalidInput { input: String },

    #[error("HTTP error {status} for date {date}")]
    HttpStatus {
        status: reqwest::StatusCode,
        date: DateKey,
    },

    /// Transport failure: DNS, connection, timeout or a broken body stream.
    #[error("network error when fetching data for {date}: {source}")]
    Network {
        date: DateKey,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered but the body could not be decoded.
    #[error("error fetching data for {date}: {source}")]
    Fetch {
        date: DateKey,
        #[source]
        source: serde_json::Error,
    },

    /// The record for `date` does not have the expected shape.
    #[error("unexpected API data for {date}: {reason}")]
    Extraction { date: DateKey, reason: String },

    #[error("failed to open HTTP session: {0}")]
    Session(#[source] reqwest::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RateError {
    /// Whether the error belongs to a single day and should not abort a batch.
    pub fn is_per_day(&self) -> bool {
        matches!(
            self,
            RateError::HttpStatus { .. }
                | RateError::Network { .. }
                | RateError::Fetch { .. }
                | RateError::Extraction { .. }
        )
    }

    /// Errors caused by what the user typed rather than by the environment.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            RateError::InvalidArgument(_) | RateError::InvalidInput { .. }
        )
    }
}
