//! Portfolio repository and service traits.

use async_trait::async_trait;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use crate::access::Actor;
use crate::errors::Result;

/// Trait defining the contract for Portfolio repository operations.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio>;

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio>;

    /// Deletes a portfolio together with its holdings, transactions and
    /// follows. Returns the number of deleted portfolio rows.
    async fn delete(&self, portfolio_id: &str) -> Result<usize>;

    fn get_by_id(&self, portfolio_id: &str) -> Result<Option<Portfolio>>;

    fn get_by_ids(&self, portfolio_ids: &[String]) -> Result<Vec<Portfolio>>;

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Portfolio>>;

    /// Public portfolios, newest first.
    fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Portfolio>>;

    fn list_all(&self) -> Result<Vec<Portfolio>>;
}

/// Trait defining the contract for Portfolio service operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(&self, actor: &Actor, new_portfolio: NewPortfolio)
        -> Result<Portfolio>;

    async fn update_portfolio(
        &self,
        actor: &Actor,
        portfolio_id: &str,
        update: PortfolioUpdate,
    ) -> Result<Portfolio>;

    async fn delete_portfolio(&self, actor: &Actor, portfolio_id: &str) -> Result<()>;

    fn get_portfolio(&self, actor: &Actor, portfolio_id: &str) -> Result<Portfolio>;

    fn list_my_portfolios(&self, actor: &Actor) -> Result<Vec<Portfolio>>;
}
