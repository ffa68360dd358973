use std::collections::HashMap;

use async_trait::async_trait;

use super::social_model::{Follow, Page};
use crate::access::Actor;
use crate::errors::Result;
use crate::events::ActivityLogEntry;
use crate::portfolios::PortfolioSummary;

#[async_trait]
pub trait FollowRepositoryTrait: Send + Sync {
    /// Inserts the follow unless it already exists. Returns `true` when a
    /// row was created.
    async fn follow(&self, follow: Follow) -> Result<bool>;

    /// Returns `true` when a row was deleted.
    async fn unfollow(&self, user_id: &str, portfolio_id: &str) -> Result<bool>;

    /// Ids of the portfolios a user follows, most recent follow first.
    fn list_followed_ids(&self, user_id: &str) -> Result<Vec<String>>;

    /// Number of followers per portfolio. Portfolios without followers are
    /// absent from the map.
    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>>;
}

#[async_trait]
pub trait SocialServiceTrait: Send + Sync {
    async fn follow(&self, actor: &Actor, portfolio_id: &str) -> Result<()>;

    async fn unfollow(&self, actor: &Actor, portfolio_id: &str) -> Result<()>;

    /// Public portfolios, newest first.
    fn explore(&self, page: Page) -> Result<Vec<PortfolioSummary>>;

    fn following(&self, actor: &Actor) -> Result<Vec<PortfolioSummary>>;

    fn admin_overview(&self, actor: &Actor) -> Result<Vec<PortfolioSummary>>;

    /// Recent activity of followed portfolios, newest first.
    fn feed(&self, actor: &Actor, limit: Option<i64>) -> Result<Vec<ActivityLogEntry>>;
}
