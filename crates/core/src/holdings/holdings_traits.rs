//! Holding repository and service traits.

use std::collections::HashMap;

use async_trait::async_trait;

use super::holdings_model::{Holding, ValuedHolding};
use crate::access::Actor;
use crate::errors::Result;

/// Read access to stored holdings.
///
/// Holdings are only ever written by the transaction repository, inside the
/// same write transaction that records or deletes the triggering trade.
pub trait HoldingRepositoryTrait: Send + Sync {
    fn get(&self, portfolio_id: &str, symbol: &str) -> Result<Option<Holding>>;

    /// Holdings of a portfolio ordered by symbol.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>>;

    /// Number of holdings per portfolio, in one query per chunk of ids.
    /// Portfolios without holdings are absent from the map.
    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>>;
}

#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    fn list_holdings(&self, actor: &Actor, portfolio_id: &str) -> Result<Vec<Holding>>;

    fn get_holding(&self, actor: &Actor, portfolio_id: &str, symbol: &str) -> Result<Holding>;

    /// Holdings priced with the latest quotes. Symbols whose quote cannot be
    /// fetched are returned unpriced.
    async fn valued_holdings(&self, actor: &Actor, portfolio_id: &str)
        -> Result<Vec<ValuedHolding>>;
}
