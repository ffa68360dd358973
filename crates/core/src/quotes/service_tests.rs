//! Tests for QuoteService caching and batch behavior.

#[cfg(test)]
mod tests {
    use crate::access::Actor;
    use crate::holdings::AssetType;
    use crate::quotes::{
        PriceCache, PriceCacheConfig, Quote, QuoteError, QuoteProvider, QuoteRequest,
        QuoteService, QuoteServiceTrait,
    };
    use crate::Error;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // =========================================================================
    // Mock provider
    // =========================================================================

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for CountingProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn latest_quote(
            &self,
            symbol: &str,
            asset_type: AssetType,
        ) -> std::result::Result<Quote, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if symbol == "DELISTED" {
                return Err(QuoteError::NoData(symbol.to_string()));
            }
            Ok(Quote {
                symbol: symbol.to_string(),
                asset_type,
                price: dec!(42.5),
                currency: "USD".to_string(),
                fetched_at: Utc::now(),
            })
        }
    }

    fn service() -> (QuoteService, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider::default());
        let cache = Arc::new(PriceCache::new(&PriceCacheConfig::default()));
        (QuoteService::new(cache, provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let (service, provider) = service();

        let first = service.get_quote("aapl", AssetType::UsStock).await.unwrap();
        let second = service.get_quote("AAPL", AssetType::UsStock).await.unwrap();

        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (service, provider) = service();

        service.get_quote("AAPL", AssetType::UsStock).await.unwrap();
        service.invalidate("AAPL", AssetType::UsStock).await;
        service.get_quote("AAPL", AssetType::UsStock).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_cash_never_hits_provider() {
        let (service, provider) = service();

        let quote = service.get_quote("usd", AssetType::Cash).await.unwrap();
        assert_eq!(quote.price, dec!(1));
        assert_eq!(quote.currency, "USD");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let (service, provider) = service();

        let result = service.get_quote("DELISTED", AssetType::UsStock).await;
        assert!(matches!(result, Err(Error::Quote(QuoteError::NoData(_)))));
        let _ = service.get_quote("DELISTED", AssetType::UsStock).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_quotes_drops_failures() {
        let (service, _) = service();

        let quotes = service
            .get_quotes(&[
                QuoteRequest::new("AAPL", AssetType::UsStock),
                QuoteRequest::new("DELISTED", AssetType::UsStock),
                QuoteRequest::new("BTC", AssetType::Crypto),
            ])
            .await;

        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "BTC"]);
    }

    #[tokio::test]
    async fn test_clear_cache_requires_admin() {
        let (service, provider) = service();
        service.get_quote("AAPL", AssetType::UsStock).await.unwrap();

        let denied = service.clear_cache(&Actor::user("u1"));
        assert!(matches!(denied, Err(Error::Unauthorized(_))));

        service.clear_cache(&Actor::admin("root")).unwrap();
        service.get_quote("AAPL", AssetType::UsStock).await.unwrap();
        assert_eq!(provider.calls(), 2);
    }
}
