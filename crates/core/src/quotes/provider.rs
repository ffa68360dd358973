//! Quote providers.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;

use super::errors::QuoteError;
use super::model::Quote;
use crate::holdings::AssetType;

/// Source of latest prices.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn id(&self) -> &'static str;

    async fn latest_quote(
        &self,
        symbol: &str,
        asset_type: AssetType,
    ) -> std::result::Result<Quote, QuoteError>;
}

/// Yahoo Finance backed provider.
pub struct YahooQuoteProvider {
    connector: yahoo::YahooConnector,
}

impl YahooQuoteProvider {
    pub fn new() -> std::result::Result<Self, QuoteError> {
        let connector = yahoo::YahooConnector::new()?;
        Ok(Self { connector })
    }

    /// Maps a portfolio symbol to the Yahoo ticker: Borsa Istanbul listings
    /// carry `.IS`, crypto is quoted against USD.
    pub fn ticker_for(symbol: &str, asset_type: AssetType) -> String {
        match asset_type {
            AssetType::TrStock if !symbol.ends_with(".IS") => format!("{}.IS", symbol),
            AssetType::Crypto if !symbol.contains('-') => format!("{}-USD", symbol),
            _ => symbol.to_string(),
        }
    }

    fn currency_for(asset_type: AssetType, symbol: &str) -> String {
        match asset_type {
            AssetType::TrStock => "TRY".to_string(),
            AssetType::UsStock | AssetType::Crypto => "USD".to_string(),
            AssetType::Cash => symbol.to_string(),
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn id(&self) -> &'static str {
        "YAHOO"
    }

    async fn latest_quote(
        &self,
        symbol: &str,
        asset_type: AssetType,
    ) -> std::result::Result<Quote, QuoteError> {
        let ticker = Self::ticker_for(symbol, asset_type);
        debug!("Fetching latest quote for {} from Yahoo", ticker);

        let response = self.connector.get_latest_quotes(&ticker, "1d").await?;
        let last = response.last_quote()?;
        let price = Decimal::from_f64(last.close)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| {
                QuoteError::InvalidData(format!("{} closed at {}", ticker, last.close))
            })?;
        let fetched_at = Utc
            .timestamp_opt(last.timestamp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(Quote {
            symbol: symbol.to_string(),
            asset_type,
            price: price.round_dp(6),
            currency: Self::currency_for(asset_type, symbol),
            fetched_at,
        })
    }
}
