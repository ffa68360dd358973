//! Position recompute rule.
//!
//! Pure functions mapping (current position, trade) to the next position.
//! `apply_trade` runs when a transaction is recorded, `undo_trade` when one
//! is deleted. Neither touches storage; callers persist the returned
//! [`PositionTransition`].

use rust_decimal::Decimal;

use super::holdings_model::Position;
use crate::errors::{PositionError, ValidationError};
use crate::transactions::TransactionSide;
use crate::utils::decimal_math;
use crate::Result;

/// The fields of a transaction the rule needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub symbol: String,
    pub side: TransactionSide,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl Trade {
    pub fn buy(symbol: &str, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: TransactionSide::Buy,
            quantity,
            price,
        }
    }

    pub fn sell(symbol: &str, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: TransactionSide::Sell,
            quantity,
            price,
        }
    }
}

/// What should happen to the stored holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionTransition {
    /// Create the holding or overwrite it with this position.
    Upsert(Position),
    /// Remove the holding row.
    Delete,
    /// Leave storage as it is.
    Unchanged,
}

impl PositionTransition {
    /// The position that exists after this transition is persisted.
    pub fn resulting(self, existing: Option<Position>) -> Option<Position> {
        match self {
            PositionTransition::Upsert(position) => Some(position),
            PositionTransition::Delete => None,
            PositionTransition::Unchanged => existing,
        }
    }
}

/// Result of reversing a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoOutcome {
    pub transition: PositionTransition,
    /// Set when the sale price had to stand in for the unknown cost basis.
    pub approximate: bool,
}

impl UndoOutcome {
    fn exact(transition: PositionTransition) -> Self {
        Self {
            transition,
            approximate: false,
        }
    }
}

fn validate_trade(trade: &Trade) -> Result<()> {
    if trade.quantity <= Decimal::ZERO {
        return Err(ValidationError::invalid(format!(
            "Quantity must be greater than zero (got {})",
            trade.quantity
        )));
    }
    if trade.price <= Decimal::ZERO {
        return Err(ValidationError::invalid(format!(
            "Price must be greater than zero (got {})",
            trade.price
        )));
    }
    Ok(())
}

/// Computes the next position when `trade` is recorded.
///
/// A SELL is rejected with [`PositionError`] when the symbol is not held or
/// the position is smaller than the sold quantity; in that case nothing may
/// be persisted. Buying blends the price into the weighted average, selling
/// leaves the average untouched. Amounts whose product or sum leaves the
/// decimal range are rejected as invalid input.
pub fn apply_trade(existing: Option<&Position>, trade: &Trade) -> Result<PositionTransition> {
    validate_trade(trade)?;

    match (trade.side, existing) {
        (TransactionSide::Buy, None) => Ok(PositionTransition::Upsert(Position::new(
            trade.quantity,
            trade.price,
        )?)),
        (TransactionSide::Buy, Some(position)) => {
            let new_quantity = decimal_math::add(position.quantity, trade.quantity)?;
            let new_cost = decimal_math::add(
                position.cost_basis,
                decimal_math::mul(trade.quantity, trade.price)?,
            )?;
            Ok(PositionTransition::Upsert(Position::from_cost(
                new_quantity,
                new_cost,
            )?))
        }
        (TransactionSide::Sell, None) => Err(PositionError::NotHeld {
            symbol: trade.symbol.clone(),
        }
        .into()),
        (TransactionSide::Sell, Some(position)) => {
            if position.quantity < trade.quantity {
                return Err(PositionError::ExceedsPosition {
                    symbol: trade.symbol.clone(),
                    held: position.quantity,
                    requested: trade.quantity,
                }
                .into());
            }
            let new_quantity = position.quantity - trade.quantity;
            if new_quantity <= Decimal::ZERO {
                Ok(PositionTransition::Delete)
            } else {
                Ok(PositionTransition::Upsert(Position::new(
                    new_quantity,
                    position.avg_price,
                )?))
            }
        }
    }
}

/// Computes the position after `trade` is removed from the history.
///
/// Undoing a BUY takes its quantity and cost back out (cost floored at zero).
/// Undoing a SELL adds the quantity back at the current average. When the
/// SELL had liquidated the position and nothing was bought since, the true
/// cost basis is unknown here; the sale price is used and the outcome is
/// flagged `approximate` so the caller can rebuild from history instead.
pub fn undo_trade(existing: Option<&Position>, trade: &Trade) -> Result<UndoOutcome> {
    validate_trade(trade)?;

    let outcome = match (trade.side, existing) {
        (TransactionSide::Buy, None) => UndoOutcome::exact(PositionTransition::Unchanged),
        (TransactionSide::Buy, Some(position)) => {
            let new_quantity = position.quantity - trade.quantity;
            if new_quantity <= Decimal::ZERO {
                UndoOutcome::exact(PositionTransition::Delete)
            } else {
                let new_cost = decimal_math::sub(
                    position.cost_basis,
                    decimal_math::mul(trade.quantity, trade.price)?,
                )?
                .max(Decimal::ZERO);
                UndoOutcome::exact(PositionTransition::Upsert(Position::from_cost(
                    new_quantity,
                    new_cost,
                )?))
            }
        }
        (TransactionSide::Sell, Some(position)) => {
            let new_quantity = decimal_math::add(position.quantity, trade.quantity)?;
            UndoOutcome::exact(PositionTransition::Upsert(Position::new(
                new_quantity,
                position.avg_price,
            )?))
        }
        (TransactionSide::Sell, None) => UndoOutcome {
            transition: PositionTransition::Upsert(Position::new(trade.quantity, trade.price)?),
            approximate: true,
        },
    };

    Ok(outcome)
}
