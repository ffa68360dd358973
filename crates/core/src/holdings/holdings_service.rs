use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::holdings_model::{Holding, ValuedHolding};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
use crate::access::Actor;
use crate::portfolios::{require_portfolio, PortfolioRepositoryTrait};
use crate::quotes::{QuoteRequest, QuoteServiceTrait};
use crate::transactions::normalize_symbol;
use crate::{Error, Result};

/// Read side of holdings, with optional quote valuation.
pub struct HoldingsService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl HoldingsService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            holding_repository,
            quote_service,
        }
    }
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    fn list_holdings(&self, actor: &Actor, portfolio_id: &str) -> Result<Vec<Holding>> {
        let portfolio = require_portfolio(self.portfolio_repository.as_ref(), portfolio_id)?;
        actor.ensure_can_view(&portfolio)?;
        self.holding_repository.list_by_portfolio(portfolio_id)
    }

    fn get_holding(&self, actor: &Actor, portfolio_id: &str, symbol: &str) -> Result<Holding> {
        let portfolio = require_portfolio(self.portfolio_repository.as_ref(), portfolio_id)?;
        actor.ensure_can_view(&portfolio)?;
        let symbol = normalize_symbol(symbol);
        self.holding_repository
            .get(portfolio_id, &symbol)?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "no holding of {} in portfolio {}",
                    symbol, portfolio_id
                ))
            })
    }

    async fn valued_holdings(
        &self,
        actor: &Actor,
        portfolio_id: &str,
    ) -> Result<Vec<ValuedHolding>> {
        let holdings = self.list_holdings(actor, portfolio_id)?;
        if holdings.is_empty() {
            return Ok(Vec::new());
        }

        let requests: Vec<QuoteRequest> = holdings
            .iter()
            .map(|h| QuoteRequest::new(&h.symbol, h.asset_type))
            .collect();
        let quotes: HashMap<String, _> = self
            .quote_service
            .get_quotes(&requests)
            .await
            .into_iter()
            .map(|q| (q.symbol.clone(), q))
            .collect();

        debug!(
            "Valuing {} holdings of portfolio {} with {} quotes",
            holdings.len(),
            portfolio_id,
            quotes.len()
        );

        Ok(holdings
            .into_iter()
            .map(|holding| match quotes.get(&holding.symbol) {
                Some(quote) => {
                    match ValuedHolding::priced(holding.clone(), quote.price, quote.currency.clone()) {
                        Ok(valued) => valued,
                        Err(e) => {
                            warn!("Leaving {} unpriced: {}", holding.symbol, e);
                            ValuedHolding::unpriced(holding)
                        }
                    }
                }
                None => ValuedHolding::unpriced(holding),
            })
            .collect())
    }
}
