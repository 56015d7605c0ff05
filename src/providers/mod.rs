pub mod privatbank;

use crate::core::RateError;

pub use privatbank::PrivatBankClient;

/// Builds the HTTP session shared by all requests of one batch. Dropping the
/// client releases its pooled connections.
pub fn open_session() -> Result<reqwest::Client, RateError> {
    reqwest::Client::builder()
        .user_agent(concat!("pbfx/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(RateError::Session)
}
