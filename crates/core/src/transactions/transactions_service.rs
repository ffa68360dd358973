use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};

use super::transactions_model::{
    normalize_symbol, CostBasisSource, NewTransaction, RealizedPnlReport, RecordedTransaction,
    RemovedTransaction, Transaction,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::access::Actor;
use crate::events::{DomainEvent, DomainEventSink};
use crate::holdings::ledger::realized_pnl_report;
use crate::portfolios::{require_portfolio, PortfolioRepositoryTrait};
use crate::{Error, Result};

/// Records and deletes trades, keeping holdings in step.
pub struct TransactionService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl TransactionService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            portfolio_repository,
            transaction_repository,
            event_sink,
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(
        &self,
        actor: &Actor,
        portfolio_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<RecordedTransaction> {
        new_transaction.validate()?;
        let portfolio = require_portfolio(self.portfolio_repository.as_ref(), portfolio_id)?;
        actor.ensure_owner(&portfolio)?;

        let transaction =
            new_transaction.into_transaction(portfolio_id, Utc::now().naive_utc())?;
        debug!(
            "Recording {} {} {} @ {} in portfolio {}",
            transaction.side,
            transaction.quantity,
            transaction.symbol,
            transaction.price,
            portfolio_id
        );

        let recorded = self.transaction_repository.record(transaction).await?;
        self.event_sink.emit(DomainEvent::transaction_recorded(
            &actor.user_id,
            &recorded.transaction,
            recorded.holding.as_ref(),
        ));
        Ok(recorded)
    }

    async fn delete_transaction(
        &self,
        actor: &Actor,
        transaction_id: &str,
    ) -> Result<RemovedTransaction> {
        let transaction = self
            .transaction_repository
            .get_by_id(transaction_id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {} not found", transaction_id)))?;
        let portfolio =
            require_portfolio(self.portfolio_repository.as_ref(), &transaction.portfolio_id)?;
        actor.ensure_owner(&portfolio)?;

        let removed = self.transaction_repository.remove(transaction_id).await?;
        if removed.cost_basis_source == CostBasisSource::SalePriceApproximation {
            warn!(
                "Holding {} in portfolio {} restored with approximate cost basis",
                removed.transaction.symbol, removed.transaction.portfolio_id
            );
        }
        self.event_sink.emit(DomainEvent::transaction_removed(
            &actor.user_id,
            &removed.transaction,
            removed.cost_basis_source,
        ));
        Ok(removed)
    }

    fn list_transactions(
        &self,
        actor: &Actor,
        portfolio_id: &str,
        symbol: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let portfolio = require_portfolio(self.portfolio_repository.as_ref(), portfolio_id)?;
        actor.ensure_can_view(&portfolio)?;
        let symbol = symbol.map(normalize_symbol).filter(|s| !s.is_empty());
        self.transaction_repository
            .list(portfolio_id, symbol.as_deref())
    }

    fn realized_pnl(&self, actor: &Actor, portfolio_id: &str) -> Result<RealizedPnlReport> {
        let portfolio = require_portfolio(self.portfolio_repository.as_ref(), portfolio_id)?;
        actor.ensure_can_view(&portfolio)?;
        let transactions = self.transaction_repository.list(portfolio_id, None)?;
        realized_pnl_report(portfolio_id, &transactions)
    }
}
