use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use xportfoy_core::{
    events::{ActivityLogRepositoryTrait, DomainEventSink, NoOpNotifier, Notifier},
    holdings::{HoldingsService, HoldingsServiceTrait},
    portfolios::{PortfolioService, PortfolioServiceTrait},
    quotes::{
        PriceCache, PriceCacheConfig, QuoteProvider, QuoteService, QuoteServiceTrait,
        YahooQuoteProvider,
    },
    social::{SocialService, SocialServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
};
use xportfoy_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, ActivityLogRepository, FollowRepository,
    HoldingRepository, PortfolioRepository, TransactionRepository,
};

use crate::{
    auth::AuthManager,
    config::{Config, LogFormat},
    domain_events::{ServerDomainEventSink, WorkerDeps},
    notifier::TelegramNotifier,
};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub social_service: Arc<dyn SocialServiceTrait>,
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer(&pool)?;

    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));
    let holding_repository = Arc::new(HoldingRepository::new(pool.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let follow_repository = Arc::new(FollowRepository::new(pool.clone(), writer.clone()));
    let activity_log_repository: Arc<dyn ActivityLogRepositoryTrait> =
        Arc::new(ActivityLogRepository::new(pool.clone(), writer.clone()));

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => {
            tracing::info!("Telegram notifications enabled");
            Arc::new(TelegramNotifier::new(telegram))
        }
        None => Arc::new(NoOpNotifier),
    };
    let event_sink: Arc<dyn DomainEventSink> = Arc::new(ServerDomainEventSink::spawn(WorkerDeps {
        activity_log: activity_log_repository.clone(),
        notifier,
    }));

    let price_cache = Arc::new(PriceCache::new(&PriceCacheConfig::with_capacity(
        config.quote_cache_capacity,
    )));
    let quote_provider: Arc<dyn QuoteProvider> = Arc::new(YahooQuoteProvider::new()?);
    let quote_service: Arc<dyn QuoteServiceTrait> =
        Arc::new(QuoteService::new(price_cache, quote_provider));

    let portfolio_service = Arc::new(PortfolioService::new(
        portfolio_repository.clone(),
        event_sink.clone(),
    ));
    let holdings_service = Arc::new(HoldingsService::new(
        portfolio_repository.clone(),
        holding_repository.clone(),
        quote_service.clone(),
    ));
    let transaction_service = Arc::new(TransactionService::new(
        portfolio_repository.clone(),
        transaction_repository.clone(),
        event_sink.clone(),
    ));
    let social_service = Arc::new(SocialService::new(
        portfolio_repository,
        holding_repository,
        transaction_repository,
        follow_repository,
        activity_log_repository,
        event_sink,
    ));

    Ok(Arc::new(AppState {
        portfolio_service,
        holdings_service,
        transaction_service,
        social_service,
        quote_service,
        auth: Arc::new(AuthManager::new(&config.jwt_secret)),
    }))
}
