//! Translates rule outcomes into storage writes.
//!
//! Repositories read the current holding and the transaction inside one
//! write transaction, ask this module what to write, and execute the
//! returned [`HoldingWrite`] before committing.

use chrono::NaiveDateTime;
use log::{debug, warn};

use super::holdings_model::Holding;
use super::ledger::replay;
use super::position_rule::{apply_trade, undo_trade, PositionTransition};
use crate::errors::ValidationError;
use crate::transactions::{CostBasisSource, Transaction};
use crate::Result;

/// A single write against the holdings table.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldingWrite {
    Insert(Holding),
    /// Overwrite the row only if its version still equals `expected_version`.
    Update {
        holding: Holding,
        expected_version: i64,
    },
    /// Remove the row only if its version still equals `expected_version`.
    Delete {
        portfolio_id: String,
        symbol: String,
        expected_version: i64,
    },
    Noop,
}

impl HoldingWrite {
    /// The holding as it will exist once this write is applied.
    pub fn holding_after(&self, existing: Option<&Holding>) -> Option<Holding> {
        match self {
            HoldingWrite::Insert(holding) | HoldingWrite::Update { holding, .. } => {
                Some(holding.clone())
            }
            HoldingWrite::Delete { .. } => None,
            HoldingWrite::Noop => existing.cloned(),
        }
    }
}

/// Holding write plus how the cost basis was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoPlan {
    pub write: HoldingWrite,
    pub cost_basis_source: CostBasisSource,
}

fn to_write(
    existing: Option<&Holding>,
    transition: PositionTransition,
    tx: &Transaction,
    now: NaiveDateTime,
) -> HoldingWrite {
    match (transition, existing) {
        (PositionTransition::Upsert(position), Some(current)) => HoldingWrite::Update {
            holding: current.with_position(position, now),
            expected_version: current.version,
        },
        (PositionTransition::Upsert(position), None) => HoldingWrite::Insert(Holding {
            portfolio_id: tx.portfolio_id.clone(),
            symbol: tx.symbol.clone(),
            asset_type: tx.asset_type,
            quantity: position.quantity,
            avg_price: position.avg_price,
            cost_basis: position.cost_basis,
            version: 1,
            created_at: now,
            updated_at: now,
        }),
        (PositionTransition::Delete, Some(current)) => HoldingWrite::Delete {
            portfolio_id: current.portfolio_id.clone(),
            symbol: current.symbol.clone(),
            expected_version: current.version,
        },
        (PositionTransition::Delete, None) | (PositionTransition::Unchanged, _) => {
            HoldingWrite::Noop
        }
    }
}

/// Plans the holding write for recording `tx`.
///
/// Returns an error, and nothing must be written, when the trade is invalid
/// or a SELL is not covered by `existing`.
pub fn plan_record(
    existing: Option<&Holding>,
    tx: &Transaction,
    now: NaiveDateTime,
) -> Result<HoldingWrite> {
    if let Some(current) = existing {
        if current.asset_type != tx.asset_type {
            return Err(ValidationError::invalid(format!(
                "{} is held as {} but the transaction says {}",
                tx.symbol, current.asset_type, tx.asset_type
            )));
        }
    }

    let position = existing.map(Holding::position);
    let transition = apply_trade(position.as_ref(), &tx.to_trade())?;
    Ok(to_write(existing, transition, tx, now))
}

/// Plans the holding write for deleting `tx`.
///
/// `load_history` is only called when the rule cannot invert the trade
/// exactly (a SELL that had liquidated the position); the remaining history
/// is then replayed to rebuild the true position. If the replay fails the
/// sale-price approximation is kept.
pub fn plan_remove<F>(
    existing: Option<&Holding>,
    tx: &Transaction,
    now: NaiveDateTime,
    load_history: F,
) -> Result<UndoPlan>
where
    F: FnOnce() -> Result<Vec<Transaction>>,
{
    let position = existing.map(Holding::position);
    let outcome = undo_trade(position.as_ref(), &tx.to_trade())?;

    if !outcome.approximate {
        return Ok(UndoPlan {
            write: to_write(existing, outcome.transition, tx, now),
            cost_basis_source: CostBasisSource::Incremental,
        });
    }

    let replayed = load_history().and_then(|history| {
        let remaining: Vec<Transaction> = history.into_iter().filter(|t| t.id != tx.id).collect();
        replay(&tx.symbol, &remaining)
    });

    match replayed {
        Ok(ledger) => {
            debug!(
                "Rebuilt {} in portfolio {} from {} remaining transactions",
                tx.symbol, tx.portfolio_id, ledger.transaction_count
            );
            let transition = match ledger.position {
                Some(position) => PositionTransition::Upsert(position),
                None => PositionTransition::Unchanged,
            };
            Ok(UndoPlan {
                write: to_write(existing, transition, tx, now),
                cost_basis_source: CostBasisSource::Replayed,
            })
        }
        Err(e) => {
            warn!(
                "Could not replay history of {} in portfolio {} ({}); using sale price {} as cost basis",
                tx.symbol, tx.portfolio_id, e, tx.price
            );
            Ok(UndoPlan {
                write: to_write(existing, outcome.transition, tx, now),
                cost_basis_source: CostBasisSource::SalePriceApproximation,
            })
        }
    }
}
