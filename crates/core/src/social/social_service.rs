use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::social_model::{Follow, Page};
use super::social_traits::{FollowRepositoryTrait, SocialServiceTrait};
use crate::access::Actor;
use crate::constants::{DEFAULT_EXPLORE_LIMIT, MAX_EXPLORE_LIMIT};
use crate::errors::ValidationError;
use crate::events::{ActivityLogEntry, ActivityLogRepositoryTrait, DomainEvent, DomainEventSink};
use crate::holdings::HoldingRepositoryTrait;
use crate::portfolios::{require_portfolio, Portfolio, PortfolioRepositoryTrait, PortfolioSummary};
use crate::transactions::TransactionRepositoryTrait;
use crate::Result;

/// Following, discovery and the admin overview.
pub struct SocialService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    follow_repository: Arc<dyn FollowRepositoryTrait>,
    activity_log_repository: Arc<dyn ActivityLogRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl SocialService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        follow_repository: Arc<dyn FollowRepositoryTrait>,
        activity_log_repository: Arc<dyn ActivityLogRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            portfolio_repository,
            holding_repository,
            transaction_repository,
            follow_repository,
            activity_log_repository,
            event_sink,
        }
    }

    /// Attaches holding, transaction and follower counts with one bulk
    /// query per count, whatever the number of portfolios.
    fn summarize(&self, portfolios: Vec<Portfolio>) -> Result<Vec<PortfolioSummary>> {
        if portfolios.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = portfolios.iter().map(|p| p.id.clone()).collect();
        let holdings = self.holding_repository.count_by_portfolios(&ids)?;
        let transactions = self.transaction_repository.count_by_portfolios(&ids)?;
        let followers = self.follow_repository.count_by_portfolios(&ids)?;

        Ok(portfolios
            .into_iter()
            .map(|portfolio| PortfolioSummary {
                holdings_count: holdings.get(&portfolio.id).copied().unwrap_or(0),
                transactions_count: transactions.get(&portfolio.id).copied().unwrap_or(0),
                followers_count: followers.get(&portfolio.id).copied().unwrap_or(0),
                portfolio,
            })
            .collect())
    }
}

#[async_trait]
impl SocialServiceTrait for SocialService {
    async fn follow(&self, actor: &Actor, portfolio_id: &str) -> Result<()> {
        let portfolio = require_portfolio(self.portfolio_repository.as_ref(), portfolio_id)?;
        actor.ensure_can_view(&portfolio)?;
        if actor.owns(&portfolio) {
            return Err(ValidationError::invalid(
                "You cannot follow your own portfolio",
            ));
        }
        if !portfolio.is_public {
            return Err(ValidationError::invalid(
                "Only public portfolios can be followed",
            ));
        }

        let created = self
            .follow_repository
            .follow(Follow {
                user_id: actor.user_id.clone(),
                portfolio_id: portfolio.id.clone(),
                created_at: Utc::now().naive_utc(),
            })
            .await?;
        if created {
            self.event_sink
                .emit(DomainEvent::portfolio_followed(&actor.user_id, &portfolio));
        } else {
            debug!(
                "User {} already follows portfolio {}",
                actor.user_id, portfolio_id
            );
        }
        Ok(())
    }

    async fn unfollow(&self, actor: &Actor, portfolio_id: &str) -> Result<()> {
        let removed = self
            .follow_repository
            .unfollow(&actor.user_id, portfolio_id)
            .await?;
        if !removed {
            debug!(
                "User {} did not follow portfolio {}",
                actor.user_id, portfolio_id
            );
        }
        Ok(())
    }

    fn explore(&self, page: Page) -> Result<Vec<PortfolioSummary>> {
        let (limit, offset) = page.resolve(DEFAULT_EXPLORE_LIMIT, MAX_EXPLORE_LIMIT);
        let portfolios = self.portfolio_repository.list_public(limit, offset)?;
        self.summarize(portfolios)
    }

    fn following(&self, actor: &Actor) -> Result<Vec<PortfolioSummary>> {
        let ids = self.follow_repository.list_followed_ids(&actor.user_id)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut portfolios = self.portfolio_repository.get_by_ids(&ids)?;
        // A followed portfolio may have been made private since.
        portfolios.retain(|p| p.is_public);
        portfolios.sort_by_key(|p| ids.iter().position(|id| id == &p.id));
        self.summarize(portfolios)
    }

    fn admin_overview(&self, actor: &Actor) -> Result<Vec<PortfolioSummary>> {
        actor.ensure_admin()?;
        let portfolios = self.portfolio_repository.list_all()?;
        self.summarize(portfolios)
    }

    fn feed(&self, actor: &Actor, limit: Option<i64>) -> Result<Vec<ActivityLogEntry>> {
        let ids = self.follow_repository.list_followed_ids(&actor.user_id)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let visible: Vec<String> = self
            .portfolio_repository
            .get_by_ids(&ids)?
            .into_iter()
            .filter(|p| p.is_public)
            .map(|p| p.id)
            .collect();
        if visible.is_empty() {
            return Ok(Vec::new());
        }
        let (limit, _) = Page {
            limit,
            offset: None,
        }
        .resolve(DEFAULT_EXPLORE_LIMIT, MAX_EXPLORE_LIMIT);
        self.activity_log_repository
            .list_for_portfolios(&visible, limit)
    }
}
