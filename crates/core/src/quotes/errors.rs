//! Quote-related error types.

use thiserror::Error;
use yahoo_finance_api::YahooError;

/// Errors that can occur while fetching a quote.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("No quote data for {0}")]
    NoData(String),

    #[error("Invalid quote data: {0}")]
    InvalidData(String),
}

impl From<YahooError> for QuoteError {
    fn from(err: YahooError) -> Self {
        match err {
            YahooError::NoQuotes => QuoteError::NoData("no quotes returned".to_string()),
            YahooError::NoResult => QuoteError::NoData("no result returned".to_string()),
            other => QuoteError::Provider(other.to_string()),
        }
    }
}
