//! Full-history replay of transactions.
//!
//! The stored holding is a running aggregate built in the order transactions
//! were recorded. Replaying the ledger in that same order rebuilds the same
//! aggregate from scratch, and additionally yields realized P&L, which the
//! running aggregate does not keep.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use log::warn;
use rust_decimal::Decimal;

use super::holdings_model::Position;
use super::position_rule::apply_trade;
use crate::transactions::{RealizedPnlReport, SymbolPnl, Transaction, TransactionSide};
use crate::utils::decimal_math;
use crate::Result;

/// Orders transactions the way they are replayed: recording time, then id.
///
/// The trade date is user-supplied and may be backdated; the SELL coverage
/// check ran against the aggregate as it stood when each row was recorded.
pub fn sort_for_replay(transactions: &mut [&Transaction]) {
    transactions.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Recording time for a new transaction of a (portfolio, symbol) pair whose
/// latest recorded transaction is `latest`; strictly after it even when the
/// clock has not advanced.
pub fn recording_stamp(now: NaiveDateTime, latest: Option<NaiveDateTime>) -> NaiveDateTime {
    match latest {
        Some(latest) if latest >= now => latest + Duration::microseconds(1),
        _ => now,
    }
}

/// Replays every transaction of `symbol` in `transactions`.
///
/// Realized P&L of a SELL is `(price - average before the sale) * quantity - fee`.
/// Fails with an insufficient-position error when the history contains a SELL
/// that its preceding BUYs cannot cover.
pub fn replay(symbol: &str, transactions: &[Transaction]) -> Result<SymbolPnl> {
    let mut ordered: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.symbol == symbol)
        .collect();
    sort_for_replay(&mut ordered);

    let mut position: Option<Position> = None;
    let mut realized_pnl = Decimal::ZERO;
    let mut total_fees = Decimal::ZERO;
    let mut asset_type = None;

    for tx in &ordered {
        let transition = apply_trade(position.as_ref(), &tx.to_trade())?;
        if tx.side == TransactionSide::Sell {
            if let Some(before) = position {
                let gain = decimal_math::mul(
                    decimal_math::sub(tx.price, before.avg_price)?,
                    tx.quantity,
                )?;
                realized_pnl = decimal_math::add(realized_pnl, decimal_math::sub(gain, tx.fee)?)?;
            }
        }
        position = transition.resulting(position);
        total_fees = decimal_math::add(total_fees, tx.fee)?;
        asset_type = Some(tx.asset_type);
    }

    Ok(SymbolPnl {
        symbol: symbol.to_string(),
        asset_type,
        position,
        realized_pnl,
        total_fees,
        transaction_count: ordered.len(),
        replay_error: None,
    })
}

fn unreplayable(symbol: &str, transactions: &[Transaction], error: String) -> SymbolPnl {
    SymbolPnl {
        symbol: symbol.to_string(),
        asset_type: transactions.first().map(|tx| tx.asset_type),
        position: None,
        realized_pnl: Decimal::ZERO,
        total_fees: Decimal::ZERO,
        transaction_count: transactions.len(),
        replay_error: Some(error),
    }
}

/// Replays every symbol of a portfolio and sums the realized results.
///
/// A symbol whose history cannot be replayed is reported with
/// `replay_error` set and contributes nothing to the totals; the other
/// symbols are unaffected.
pub fn realized_pnl_report(
    portfolio_id: &str,
    transactions: &[Transaction],
) -> Result<RealizedPnlReport> {
    let mut by_symbol: BTreeMap<&str, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_symbol
            .entry(tx.symbol.as_str())
            .or_default()
            .push(tx.clone());
    }

    let mut symbols = Vec::with_capacity(by_symbol.len());
    for (symbol, txs) in by_symbol {
        match replay(symbol, &txs) {
            Ok(pnl) => symbols.push(pnl),
            Err(e) => {
                warn!(
                    "History of {} in portfolio {} cannot be replayed: {}",
                    symbol, portfolio_id, e
                );
                symbols.push(unreplayable(symbol, &txs, e.to_string()));
            }
        }
    }

    let total_realized_pnl = decimal_math::sum(symbols.iter().map(|s| s.realized_pnl))?;
    let total_fees = decimal_math::sum(symbols.iter().map(|s| s.total_fees))?;

    Ok(RealizedPnlReport {
        portfolio_id: portfolio_id.to_string(),
        symbols,
        total_realized_pnl,
        total_fees,
    })
}
