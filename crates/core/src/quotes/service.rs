//! Cache-first quote lookups.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::cache::PriceCache;
use super::model::{Quote, QuoteRequest};
use super::provider::QuoteProvider;
use crate::access::Actor;
use crate::holdings::AssetType;
use crate::transactions::normalize_symbol;
use crate::Result;

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Latest quote, served from the cache while fresh.
    async fn get_quote(&self, symbol: &str, asset_type: AssetType) -> Result<Quote>;

    /// Quotes for a batch of symbols. Symbols that cannot be priced are
    /// logged and left out of the result.
    async fn get_quotes(&self, requests: &[QuoteRequest]) -> Vec<Quote>;

    async fn invalidate(&self, symbol: &str, asset_type: AssetType);

    /// Drops every cached price. Admin only.
    fn clear_cache(&self, actor: &Actor) -> Result<()>;
}

pub struct QuoteService {
    cache: Arc<PriceCache>,
    provider: Arc<dyn QuoteProvider>,
}

impl QuoteService {
    pub fn new(cache: Arc<PriceCache>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self { cache, provider }
    }

    /// Cash is its own unit of account.
    fn cash_quote(symbol: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            asset_type: AssetType::Cash,
            price: Decimal::ONE,
            currency: symbol.to_string(),
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_quote(&self, symbol: &str, asset_type: AssetType) -> Result<Quote> {
        let symbol = normalize_symbol(symbol);
        if asset_type == AssetType::Cash {
            return Ok(Self::cash_quote(&symbol));
        }

        if let Some(cached) = self.cache.get(&symbol, asset_type).await {
            debug!("Price cache hit for {} ({})", symbol, asset_type);
            return Ok(cached);
        }

        let quote = self.provider.latest_quote(&symbol, asset_type).await?;
        self.cache.insert(quote.clone()).await;
        Ok(quote)
    }

    async fn get_quotes(&self, requests: &[QuoteRequest]) -> Vec<Quote> {
        let lookups = requests
            .iter()
            .map(|request| self.get_quote(&request.symbol, request.asset_type));
        let results = join_all(lookups).await;

        requests
            .iter()
            .zip(results)
            .filter_map(|(request, result)| match result {
                Ok(quote) => Some(quote),
                Err(e) => {
                    warn!(
                        "No quote for {} ({}) from {}: {}",
                        request.symbol,
                        request.asset_type,
                        self.provider.id(),
                        e
                    );
                    None
                }
            })
            .collect()
    }

    async fn invalidate(&self, symbol: &str, asset_type: AssetType) {
        self.cache
            .invalidate(&normalize_symbol(symbol), asset_type)
            .await;
    }

    fn clear_cache(&self, actor: &Actor) -> Result<()> {
        actor.ensure_admin()?;
        self.cache.invalidate_all();
        info!("Price cache cleared by {}", actor.user_id);
        Ok(())
    }
}
