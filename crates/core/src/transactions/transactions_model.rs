//! Transaction domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NOTE_LEN;
use crate::errors::ValidationError;
use crate::holdings::{AssetType, Position, Trade};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionSide {
    Buy,
    Sell,
}

impl TransactionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSide::Buy => "BUY",
            TransactionSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TransactionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionSide {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(TransactionSide::Buy),
            "SELL" => Ok(TransactionSide::Sell),
            other => Err(ValidationError::invalid(format!(
                "Unknown transaction side '{}'",
                other
            ))),
        }
    }
}

/// A recorded trade. Transactions are never edited, only deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub symbol: String,
    pub asset_type: AssetType,
    pub side: TransactionSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub trade_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn to_trade(&self) -> Trade {
        Trade {
            symbol: self.symbol.clone(),
            side: self.side,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// Input model for recording a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub symbol: String,
    pub asset_type: AssetType,
    pub side: TransactionSide,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub trade_date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewTransaction {
    /// Validates the input before anything is read or written.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "symbol".to_string(),
            )));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::invalid(
                "Quantity must be greater than zero",
            ));
        }
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::invalid("Price must be greater than zero"));
        }
        if let Some(fee) = self.fee {
            if fee < Decimal::ZERO {
                return Err(ValidationError::invalid("Fee cannot be negative"));
            }
        }
        if let Some(note) = &self.note {
            if note.chars().count() > MAX_NOTE_LEN {
                return Err(ValidationError::invalid(format!(
                    "Note cannot exceed {} characters",
                    MAX_NOTE_LEN
                )));
            }
        }
        Ok(())
    }

    /// Validates and turns the input into a transaction for `portfolio_id`.
    ///
    /// Symbols are trimmed and upper-cased; the trade date defaults to today.
    pub fn into_transaction(self, portfolio_id: &str, now: NaiveDateTime) -> Result<Transaction> {
        self.validate()?;
        Ok(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            symbol: normalize_symbol(&self.symbol),
            asset_type: self.asset_type,
            side: self.side,
            quantity: self.quantity,
            price: self.price,
            fee: self.fee.unwrap_or(Decimal::ZERO),
            trade_date: self.trade_date.unwrap_or_else(|| Utc::now().date_naive()),
            note: self
                .note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: now,
        })
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Result of recording a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTransaction {
    pub transaction: Transaction,
    /// The holding after the trade; `None` when it was liquidated.
    pub holding: Option<crate::holdings::Holding>,
}

/// How the position was rebuilt after a transaction was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostBasisSource {
    /// Inverse of the stored running aggregate.
    Incremental,
    /// Rebuilt by replaying the remaining transaction history.
    Replayed,
    /// Sale price used as the cost basis; history could not be replayed.
    SalePriceApproximation,
}

/// Result of deleting a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedTransaction {
    pub transaction: Transaction,
    pub holding: Option<crate::holdings::Holding>,
    pub cost_basis_source: CostBasisSource,
}

/// Realized result for one symbol, computed by replaying its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolPnl {
    pub symbol: String,
    /// `None` only when the symbol has no transactions.
    pub asset_type: Option<AssetType>,
    pub position: Option<Position>,
    pub realized_pnl: Decimal,
    pub total_fees: Decimal,
    pub transaction_count: usize,
    /// Why the history could not be replayed (for example a SELL left
    /// uncovered after its BUY was deleted). Amounts are zero when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedPnlReport {
    pub portfolio_id: String,
    pub symbols: Vec<SymbolPnl>,
    pub total_realized_pnl: Decimal,
    pub total_fees: Decimal,
}
