use std::collections::HashMap;
use std::sync::Arc;

use diesel::dsl::count;
use diesel::prelude::*;
use diesel::SqliteConnection;

use xportfoy_core::holdings::{Holding, HoldingRepositoryTrait, HoldingWrite};
use xportfoy_core::{Error, Result};

use super::model::HoldingDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::holdings;
use crate::utils::chunk_for_sqlite;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Reads one holding on the given connection.
pub(crate) fn load_holding(
    conn: &mut SqliteConnection,
    portfolio_id: &str,
    symbol: &str,
) -> Result<Option<Holding>> {
    holdings::table
        .find((portfolio_id, symbol))
        .select(HoldingDB::as_select())
        .first::<HoldingDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Holding::try_from)
        .transpose()
}

fn stale(portfolio_id: &str, symbol: &str, expected_version: i64) -> Error {
    Error::ConstraintViolation(format!(
        "holding {} in portfolio {} changed since version {}",
        symbol, portfolio_id, expected_version
    ))
}

/// Executes a planned holding write. Updates and deletes only touch the row
/// when its version is still the one the plan was computed from.
pub(crate) fn apply_holding_write(conn: &mut SqliteConnection, write: &HoldingWrite) -> Result<()> {
    match write {
        HoldingWrite::Insert(holding) => {
            diesel::insert_into(holdings::table)
                .values(HoldingDB::from(holding))
                .execute(conn)
                .map_err(StorageError::from)?;
        }
        HoldingWrite::Update {
            holding,
            expected_version,
        } => {
            let row = HoldingDB::from(holding);
            let updated = diesel::update(
                holdings::table
                    .filter(holdings::portfolio_id.eq(&row.portfolio_id))
                    .filter(holdings::symbol.eq(&row.symbol))
                    .filter(holdings::version.eq(*expected_version)),
            )
            .set((
                holdings::quantity.eq(&row.quantity),
                holdings::avg_price.eq(&row.avg_price),
                holdings::cost_basis.eq(&row.cost_basis),
                holdings::version.eq(row.version),
                holdings::updated_at.eq(row.updated_at),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
            if updated == 0 {
                return Err(stale(&row.portfolio_id, &row.symbol, *expected_version));
            }
        }
        HoldingWrite::Delete {
            portfolio_id,
            symbol,
            expected_version,
        } => {
            let deleted = diesel::delete(
                holdings::table
                    .filter(holdings::portfolio_id.eq(portfolio_id))
                    .filter(holdings::symbol.eq(symbol))
                    .filter(holdings::version.eq(*expected_version)),
            )
            .execute(conn)
            .map_err(StorageError::from)?;
            if deleted == 0 {
                return Err(stale(portfolio_id, symbol, *expected_version));
            }
        }
        HoldingWrite::Noop => {}
    }
    Ok(())
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn get(&self, portfolio_id: &str, symbol: &str) -> Result<Option<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        load_holding(&mut conn, portfolio_id, symbol)
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .order(holdings::symbol.asc())
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(Holding::try_from)
            .collect()
    }

    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>> {
        let mut conn = get_connection(&self.pool)?;
        let mut counts = HashMap::new();
        for chunk in chunk_for_sqlite(portfolio_ids) {
            let rows = holdings::table
                .filter(holdings::portfolio_id.eq_any(chunk))
                .group_by(holdings::portfolio_id)
                .select((holdings::portfolio_id, count(holdings::symbol)))
                .load::<(String, i64)>(&mut conn)
                .map_err(StorageError::from)?;
            counts.extend(rows);
        }
        Ok(counts)
    }
}
