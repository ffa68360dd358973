//! Latest-price quotes.
//!
//! - [`cache`] - in-memory price cache with a TTL per asset type
//! - [`provider`] - the provider trait and its Yahoo Finance implementation
//! - [`service`] - cache-first lookups used by holdings valuation
//!
//! ```text
//! QuoteService → PriceCache (moka)
//!       ↓ miss
//! QuoteProvider (Yahoo Finance)
//! ```

pub mod cache;
pub mod errors;
pub mod model;
pub mod provider;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use cache::{PriceCache, PriceCacheConfig, PriceCacheStats};
pub use errors::QuoteError;
pub use model::{Quote, QuoteRequest};
pub use provider::{QuoteProvider, YahooQuoteProvider};
pub use service::{QuoteService, QuoteServiceTrait};
