//! Core business logic abstractions

pub mod config;
pub mod document;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use error::RateError;
pub use rates::{
    CurrencyCode, CurrencyRate, DailyRateProvider, DateKey, DayRates, DayResult, MAX_DAYS,
    RawRateRecord,
};
