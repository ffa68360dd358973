use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::access::Actor;
use crate::events::{DomainEvent, DomainEventSink};
use crate::{Error, Result};

/// Loads a portfolio or fails with `NotFound`.
pub fn require_portfolio(
    repository: &dyn PortfolioRepositoryTrait,
    portfolio_id: &str,
) -> Result<Portfolio> {
    repository
        .get_by_id(portfolio_id)?
        .ok_or_else(|| Error::NotFound(format!("portfolio {} not found", portfolio_id)))
}

/// Service for managing portfolios.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(
        &self,
        actor: &Actor,
        new_portfolio: NewPortfolio,
    ) -> Result<Portfolio> {
        let portfolio = new_portfolio.into_portfolio(&actor.user_id, Utc::now().naive_utc())?;
        debug!(
            "Creating portfolio '{}' for user {}",
            portfolio.name, actor.user_id
        );
        let created = self.repository.create(portfolio).await?;
        self.event_sink
            .emit(DomainEvent::portfolio_created(&actor.user_id, &created));
        Ok(created)
    }

    async fn update_portfolio(
        &self,
        actor: &Actor,
        portfolio_id: &str,
        update: PortfolioUpdate,
    ) -> Result<Portfolio> {
        update.validate()?;
        let existing = require_portfolio(self.repository.as_ref(), portfolio_id)?;
        actor.ensure_owner(&existing)?;
        let updated = update.apply_to(existing, Utc::now().naive_utc())?;
        self.repository.update(updated).await
    }

    async fn delete_portfolio(&self, actor: &Actor, portfolio_id: &str) -> Result<()> {
        let existing = require_portfolio(self.repository.as_ref(), portfolio_id)?;
        actor.ensure_owner(&existing)?;
        let deleted = self.repository.delete(portfolio_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!(
                "portfolio {} not found",
                portfolio_id
            )));
        }
        info!("Deleted portfolio {} of user {}", portfolio_id, actor.user_id);
        self.event_sink
            .emit(DomainEvent::portfolio_deleted(&actor.user_id, portfolio_id));
        Ok(())
    }

    fn get_portfolio(&self, actor: &Actor, portfolio_id: &str) -> Result<Portfolio> {
        let portfolio = require_portfolio(self.repository.as_ref(), portfolio_id)?;
        actor.ensure_can_view(&portfolio)?;
        Ok(portfolio)
    }

    fn list_my_portfolios(&self, actor: &Actor) -> Result<Vec<Portfolio>> {
        self.repository.list_by_owner(&actor.user_id)
    }
}
