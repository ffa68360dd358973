//! In-memory price cache with TTL using moka

use std::time::Duration;

use moka::future::Cache;

use super::model::Quote;
use crate::holdings::AssetType;

/// Capacity and per-asset-type TTLs of the price cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCacheConfig {
    /// Maximum entries per asset type.
    pub capacity: u64,
    pub tr_stock_ttl: Duration,
    pub us_stock_ttl: Duration,
    pub crypto_ttl: Duration,
    pub cash_ttl: Duration,
}

impl Default for PriceCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            tr_stock_ttl: Duration::from_secs(60),
            us_stock_ttl: Duration::from_secs(60),
            crypto_ttl: Duration::from_secs(30),
            cash_ttl: Duration::from_secs(3600),
        }
    }
}

impl PriceCacheConfig {
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn ttl_for(&self, asset_type: AssetType) -> Duration {
        match asset_type {
            AssetType::TrStock => self.tr_stock_ttl,
            AssetType::UsStock => self.us_stock_ttl,
            AssetType::Crypto => self.crypto_ttl,
            AssetType::Cash => self.cash_ttl,
        }
    }
}

/// Price cache with one moka cache per asset type.
///
/// Created once at startup and shared through the quote service; entries
/// expire after their asset type's TTL and can be evicted explicitly.
pub struct PriceCache {
    tr_stock: Cache<String, Quote>,
    us_stock: Cache<String, Quote>,
    crypto: Cache<String, Quote>,
    cash: Cache<String, Quote>,
}

impl PriceCache {
    pub fn new(config: &PriceCacheConfig) -> Self {
        let build = |asset_type: AssetType| {
            Cache::builder()
                .time_to_live(config.ttl_for(asset_type))
                .max_capacity(config.capacity)
                .build()
        };
        Self {
            tr_stock: build(AssetType::TrStock),
            us_stock: build(AssetType::UsStock),
            crypto: build(AssetType::Crypto),
            cash: build(AssetType::Cash),
        }
    }

    pub async fn get(&self, symbol: &str, asset_type: AssetType) -> Option<Quote> {
        self.cache_for(asset_type).get(symbol).await
    }

    pub async fn insert(&self, quote: Quote) {
        self.cache_for(quote.asset_type)
            .insert(quote.symbol.clone(), quote)
            .await;
    }

    pub async fn invalidate(&self, symbol: &str, asset_type: AssetType) {
        self.cache_for(asset_type).invalidate(symbol).await;
    }

    pub fn invalidate_all(&self) {
        for asset_type in AssetType::ALL {
            self.cache_for(asset_type).invalidate_all();
        }
    }

    /// Approximate entry counts; moka applies pending writes lazily.
    pub fn stats(&self) -> PriceCacheStats {
        PriceCacheStats {
            tr_stock_count: self.tr_stock.entry_count(),
            us_stock_count: self.us_stock.entry_count(),
            crypto_count: self.crypto.entry_count(),
            cash_count: self.cash.entry_count(),
        }
    }

    fn cache_for(&self, asset_type: AssetType) -> &Cache<String, Quote> {
        match asset_type {
            AssetType::TrStock => &self.tr_stock,
            AssetType::UsStock => &self.us_stock,
            AssetType::Crypto => &self.crypto,
            AssetType::Cash => &self.cash,
        }
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(&PriceCacheConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCacheStats {
    pub tr_stock_count: u64,
    pub us_stock_count: u64,
    pub crypto_count: u64,
    pub cash_count: u64,
}

impl PriceCacheStats {
    pub fn total(&self) -> u64 {
        self.tr_stock_count + self.us_stock_count + self.crypto_count + self.cash_count
    }
}
