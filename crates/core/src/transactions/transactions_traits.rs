//! Transaction repository and service traits.

use std::collections::HashMap;

use async_trait::async_trait;

use super::transactions_model::{
    NewTransaction, RealizedPnlReport, RecordedTransaction, RemovedTransaction, Transaction,
};
use crate::access::Actor;
use crate::errors::Result;

/// Storage contract for transactions.
///
/// `record` and `remove` own the holding transition: the implementation
/// reads the current holding, plans the write with
/// [`crate::holdings::plan_record`] / [`crate::holdings::plan_remove`], and
/// commits the transaction row and the holding write together or not at all.
/// `record` stamps `created_at` when the write is applied, so recording
/// time matches the order the holding aggregate was built in.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    async fn record(&self, transaction: Transaction) -> Result<RecordedTransaction>;

    /// Deletes the transaction and rolls its effect back from the holding.
    async fn remove(&self, transaction_id: &str) -> Result<RemovedTransaction>;

    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Transactions of a portfolio, most recent trade date first.
    fn list(&self, portfolio_id: &str, symbol: Option<&str>) -> Result<Vec<Transaction>>;

    /// Number of transactions per portfolio. Portfolios without
    /// transactions are absent from the map.
    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn create_transaction(
        &self,
        actor: &Actor,
        portfolio_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<RecordedTransaction>;

    async fn delete_transaction(
        &self,
        actor: &Actor,
        transaction_id: &str,
    ) -> Result<RemovedTransaction>;

    fn list_transactions(
        &self,
        actor: &Actor,
        portfolio_id: &str,
        symbol: Option<&str>,
    ) -> Result<Vec<Transaction>>;

    fn realized_pnl(&self, actor: &Actor, portfolio_id: &str) -> Result<RealizedPnlReport>;
}
