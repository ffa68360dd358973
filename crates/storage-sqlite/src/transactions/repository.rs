use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::dsl::{count, max};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use xportfoy_core::holdings::ledger::recording_stamp;
use xportfoy_core::holdings::{plan_record, plan_remove};
use xportfoy_core::transactions::{
    RecordedTransaction, RemovedTransaction, Transaction, TransactionRepositoryTrait,
};
use xportfoy_core::{Error, Result};

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::holdings::{apply_holding_write, load_holding};
use crate::schema::transactions;
use crate::utils::chunk_for_sqlite;

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_transaction(conn: &mut SqliteConnection, transaction_id: &str) -> Result<Option<Transaction>> {
    transactions::table
        .find(transaction_id)
        .select(TransactionDB::as_select())
        .first::<TransactionDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Transaction::try_from)
        .transpose()
}

fn load_symbol_history(
    conn: &mut SqliteConnection,
    portfolio_id: &str,
    symbol: &str,
) -> Result<Vec<Transaction>> {
    transactions::table
        .filter(transactions::portfolio_id.eq(portfolio_id))
        .filter(transactions::symbol.eq(symbol))
        .select(TransactionDB::as_select())
        .load::<TransactionDB>(conn)
        .map_err(StorageError::from)?
        .into_iter()
        .map(Transaction::try_from)
        .collect()
}

fn latest_recorded_at(
    conn: &mut SqliteConnection,
    portfolio_id: &str,
    symbol: &str,
) -> Result<Option<NaiveDateTime>> {
    transactions::table
        .filter(transactions::portfolio_id.eq(portfolio_id))
        .filter(transactions::symbol.eq(symbol))
        .select(max(transactions::created_at))
        .first::<Option<NaiveDateTime>>(conn)
        .map_err(|e| StorageError::from(e).into())
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    /// Reads the holding, plans the transition and writes both rows in one
    /// writer job. A rejected trade leaves no transaction row behind.
    ///
    /// `created_at` is stamped inside the job; jobs run one at a time, so it
    /// orders rows the way they were applied to the holding.
    async fn record(&self, mut transaction: Transaction) -> Result<RecordedTransaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RecordedTransaction> {
                let now = Utc::now().naive_utc();
                let latest =
                    latest_recorded_at(conn, &transaction.portfolio_id, &transaction.symbol)?;
                transaction.created_at = recording_stamp(now, latest);
                let existing = load_holding(conn, &transaction.portfolio_id, &transaction.symbol)?;
                let write = plan_record(existing.as_ref(), &transaction, now)?;

                diesel::insert_into(transactions::table)
                    .values(TransactionDB::from(&transaction))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                apply_holding_write(conn, &write)?;

                let holding = write.holding_after(existing.as_ref());
                debug!(
                    "Recorded transaction {}, holding now {:?}",
                    transaction.id,
                    holding.as_ref().map(|h| h.quantity)
                );
                Ok(RecordedTransaction {
                    holding,
                    transaction,
                })
            })
            .await
    }

    async fn remove(&self, transaction_id: &str) -> Result<RemovedTransaction> {
        let target = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RemovedTransaction> {
                let transaction = load_transaction(conn, &target)?
                    .ok_or_else(|| Error::NotFound(format!("transaction {} not found", target)))?;
                let existing = load_holding(conn, &transaction.portfolio_id, &transaction.symbol)?;

                let plan = plan_remove(
                    existing.as_ref(),
                    &transaction,
                    Utc::now().naive_utc(),
                    || load_symbol_history(conn, &transaction.portfolio_id, &transaction.symbol),
                )?;

                diesel::delete(transactions::table.find(&target))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                apply_holding_write(conn, &plan.write)?;

                Ok(RemovedTransaction {
                    holding: plan.write.holding_after(existing.as_ref()),
                    transaction,
                    cost_basis_source: plan.cost_basis_source,
                })
            })
            .await
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        load_transaction(&mut conn, transaction_id)
    }

    fn list(&self, portfolio_id: &str, symbol: Option<&str>) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .into_boxed();
        if let Some(symbol) = symbol {
            query = query.filter(transactions::symbol.eq(symbol));
        }
        query
            .order((
                transactions::trade_date.desc(),
                transactions::created_at.desc(),
            ))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>> {
        let mut conn = get_connection(&self.pool)?;
        let mut counts = HashMap::new();
        for chunk in chunk_for_sqlite(portfolio_ids) {
            let rows = transactions::table
                .filter(transactions::portfolio_id.eq_any(chunk))
                .group_by(transactions::portfolio_id)
                .select((transactions::portfolio_id, count(transactions::id)))
                .load::<(String, i64)>(&mut conn)
                .map_err(StorageError::from)?;
            counts.extend(rows);
        }
        Ok(counts)
    }
}
