//! In-memory repositories shared by the service tests.
//!
//! `InMemoryStore` plays every repository role. Its transaction writes go
//! through the same `plan_record` / `plan_remove` planning as the SQLite
//! store, under one mutex, so service tests observe the real holding
//! transitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::events::{ActivityLogEntry, ActivityLogRepositoryTrait};
use crate::holdings::ledger::recording_stamp;
use crate::holdings::{
    plan_record, plan_remove, AssetType, Holding, HoldingRepositoryTrait, HoldingWrite,
};
use crate::portfolios::{Portfolio, PortfolioRepositoryTrait};
use crate::social::{Follow, FollowRepositoryTrait};
use crate::transactions::{
    RecordedTransaction, RemovedTransaction, Transaction, TransactionRepositoryTrait,
    TransactionSide,
};
use crate::{Error, Result};

#[derive(Default)]
struct State {
    portfolios: Vec<Portfolio>,
    holdings: HashMap<(String, String), Holding>,
    transactions: Vec<Transaction>,
    follows: Vec<Follow>,
    activity: Vec<ActivityLogEntry>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn portfolio(id: &str, owner_id: &str, is_public: bool) -> Portfolio {
    Portfolio {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        name: format!("Portfolio {}", id),
        description: None,
        is_public,
        currency: "TRY".to_string(),
        created_at: now(),
        updated_at: now(),
    }
}

pub fn transaction(
    portfolio_id: &str,
    symbol: &str,
    side: TransactionSide,
    quantity: Decimal,
    price: Decimal,
) -> Transaction {
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        portfolio_id: portfolio_id.to_string(),
        symbol: symbol.to_string(),
        asset_type: AssetType::TrStock,
        side,
        quantity,
        price,
        fee: Decimal::ZERO,
        trade_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        note: None,
        created_at: now(),
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_portfolio(&self, portfolio: Portfolio) {
        self.state.lock().unwrap().portfolios.push(portfolio);
    }

    pub fn holding(&self, portfolio_id: &str, symbol: &str) -> Option<Holding> {
        self.state
            .lock()
            .unwrap()
            .holdings
            .get(&(portfolio_id.to_string(), symbol.to_string()))
            .cloned()
    }

    /// Stores a holding without a backing transaction.
    pub fn put_holding(&self, holding: Holding) {
        self.state.lock().unwrap().holdings.insert(
            (holding.portfolio_id.clone(), holding.symbol.clone()),
            holding,
        );
    }

    /// Stores a transaction row without touching holdings.
    pub fn put_transaction(&self, transaction: Transaction) {
        self.state.lock().unwrap().transactions.push(transaction);
    }

    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }

    fn apply(state: &mut State, write: &HoldingWrite) -> Result<()> {
        match write {
            HoldingWrite::Insert(holding) => {
                state.holdings.insert(
                    (holding.portfolio_id.clone(), holding.symbol.clone()),
                    holding.clone(),
                );
            }
            HoldingWrite::Update {
                holding,
                expected_version,
            } => {
                let key = (holding.portfolio_id.clone(), holding.symbol.clone());
                match state.holdings.get(&key) {
                    Some(current) if current.version == *expected_version => {
                        state.holdings.insert(key, holding.clone());
                    }
                    _ => return Err(Error::ConstraintViolation("stale holding".to_string())),
                }
            }
            HoldingWrite::Delete {
                portfolio_id,
                symbol,
                expected_version,
            } => {
                let key = (portfolio_id.clone(), symbol.clone());
                match state.holdings.get(&key) {
                    Some(current) if current.version == *expected_version => {
                        state.holdings.remove(&key);
                    }
                    _ => return Err(Error::ConstraintViolation("stale holding".to_string())),
                }
            }
            HoldingWrite::Noop => {}
        }
        Ok(())
    }
}

fn count_by<'a>(
    keys: impl Iterator<Item = &'a String>,
    portfolio_ids: &[String],
) -> HashMap<String, i64> {
    let mut counts = HashMap::new();
    for key in keys.filter(|k| portfolio_ids.contains(k)) {
        *counts.entry(key.clone()).or_insert(0) += 1;
    }
    counts
}

#[async_trait]
impl PortfolioRepositoryTrait for InMemoryStore {
    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio> {
        self.add_portfolio(portfolio.clone());
        Ok(portfolio)
    }

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio> {
        let mut state = self.state.lock().unwrap();
        let slot = state
            .portfolios
            .iter_mut()
            .find(|p| p.id == portfolio.id)
            .ok_or_else(|| Error::NotFound(portfolio.id.clone()))?;
        *slot = portfolio.clone();
        Ok(portfolio)
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.portfolios.len();
        state.portfolios.retain(|p| p.id != portfolio_id);
        state.holdings.retain(|(pid, _), _| pid != portfolio_id);
        state.transactions.retain(|t| t.portfolio_id != portfolio_id);
        state.follows.retain(|f| f.portfolio_id != portfolio_id);
        Ok(before - state.portfolios.len())
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Option<Portfolio>> {
        let state = self.state.lock().unwrap();
        Ok(state.portfolios.iter().find(|p| p.id == portfolio_id).cloned())
    }

    fn get_by_ids(&self, portfolio_ids: &[String]) -> Result<Vec<Portfolio>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .portfolios
            .iter()
            .filter(|p| portfolio_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Portfolio>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .portfolios
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Portfolio>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .portfolios
            .iter()
            .rev()
            .filter(|p| p.is_public)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Portfolio>> {
        Ok(self.state.lock().unwrap().portfolios.clone())
    }
}

impl HoldingRepositoryTrait for InMemoryStore {
    fn get(&self, portfolio_id: &str, symbol: &str) -> Result<Option<Holding>> {
        Ok(self.holding(portfolio_id, symbol))
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let state = self.state.lock().unwrap();
        let mut holdings: Vec<Holding> = state
            .holdings
            .values()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(holdings)
    }

    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>> {
        let state = self.state.lock().unwrap();
        Ok(count_by(
            state.holdings.keys().map(|(pid, _)| pid),
            portfolio_ids,
        ))
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryStore {
    async fn record(&self, mut transaction: Transaction) -> Result<RecordedTransaction> {
        let mut state = self.state.lock().unwrap();
        let latest = state
            .transactions
            .iter()
            .filter(|t| {
                t.portfolio_id == transaction.portfolio_id && t.symbol == transaction.symbol
            })
            .map(|t| t.created_at)
            .max();
        transaction.created_at = recording_stamp(now(), latest);
        let key = (transaction.portfolio_id.clone(), transaction.symbol.clone());
        let existing = state.holdings.get(&key).cloned();
        let write = plan_record(existing.as_ref(), &transaction, now())?;
        Self::apply(&mut state, &write)?;
        state.transactions.push(transaction.clone());
        Ok(RecordedTransaction {
            holding: write.holding_after(existing.as_ref()),
            transaction,
        })
    }

    async fn remove(&self, transaction_id: &str) -> Result<RemovedTransaction> {
        let mut state = self.state.lock().unwrap();
        let transaction = state
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(transaction_id.to_string()))?;
        let key = (transaction.portfolio_id.clone(), transaction.symbol.clone());
        let existing = state.holdings.get(&key).cloned();
        let history: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| {
                t.portfolio_id == transaction.portfolio_id && t.symbol == transaction.symbol
            })
            .cloned()
            .collect();
        let plan = plan_remove(existing.as_ref(), &transaction, now(), || Ok(history))?;
        Self::apply(&mut state, &plan.write)?;
        state.transactions.retain(|t| t.id != transaction_id);
        Ok(RemovedTransaction {
            holding: plan.write.holding_after(existing.as_ref()),
            transaction,
            cost_basis_source: plan.cost_basis_source,
        })
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned())
    }

    fn list(&self, portfolio_id: &str, symbol: Option<&str>) -> Result<Vec<Transaction>> {
        let state = self.state.lock().unwrap();
        let mut transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.portfolio_id == portfolio_id)
            .filter(|t| symbol.map_or(true, |s| t.symbol == s))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.trade_date
                .cmp(&a.trade_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(transactions)
    }

    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>> {
        let state = self.state.lock().unwrap();
        Ok(count_by(
            state.transactions.iter().map(|t| &t.portfolio_id),
            portfolio_ids,
        ))
    }
}

#[async_trait]
impl FollowRepositoryTrait for InMemoryStore {
    async fn follow(&self, follow: Follow) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state
            .follows
            .iter()
            .any(|f| f.user_id == follow.user_id && f.portfolio_id == follow.portfolio_id)
        {
            return Ok(false);
        }
        state.follows.push(follow);
        Ok(true)
    }

    async fn unfollow(&self, user_id: &str, portfolio_id: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.follows.len();
        state
            .follows
            .retain(|f| !(f.user_id == user_id && f.portfolio_id == portfolio_id));
        Ok(state.follows.len() < before)
    }

    fn list_followed_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .follows
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.portfolio_id.clone())
            .collect())
    }

    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>> {
        let state = self.state.lock().unwrap();
        Ok(count_by(
            state.follows.iter().map(|f| &f.portfolio_id),
            portfolio_ids,
        ))
    }
}

#[async_trait]
impl ActivityLogRepositoryTrait for InMemoryStore {
    async fn append(&self, entry: ActivityLogEntry) -> Result<()> {
        self.state.lock().unwrap().activity.push(entry);
        Ok(())
    }

    fn list_for_portfolios(
        &self,
        portfolio_ids: &[String],
        limit: i64,
    ) -> Result<Vec<ActivityLogEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|e| portfolio_ids.contains(&e.portfolio_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
