//! Holding domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::utils::decimal_math;
use crate::{Error, Result};

/// Asset classes a holding can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    /// Borsa Istanbul listed equity
    TrStock,
    UsStock,
    Crypto,
    /// Cash and cash-like positions (currencies, precious metals)
    Cash,
}

impl AssetType {
    pub const ALL: [AssetType; 4] = [
        AssetType::TrStock,
        AssetType::UsStock,
        AssetType::Crypto,
        AssetType::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::TrStock => "TR_STOCK",
            AssetType::UsStock => "US_STOCK",
            AssetType::Crypto => "CRYPTO",
            AssetType::Cash => "CASH",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TR_STOCK" => Ok(AssetType::TrStock),
            "US_STOCK" => Ok(AssetType::UsStock),
            "CRYPTO" => Ok(AssetType::Crypto),
            "CASH" => Ok(AssetType::Cash),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown asset type '{}'",
                other
            )))),
        }
    }
}

/// Quantity and cost of a position, independent of where it is stored.
///
/// `cost_basis` is the running total cost (`quantity * avg_price`). Keeping it
/// alongside the average lets the undo path subtract a buy's cost exactly
/// instead of re-multiplying a rounded average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub quantity: Decimal,
    pub avg_price: Decimal,
    pub cost_basis: Decimal,
}

impl Position {
    pub fn new(quantity: Decimal, avg_price: Decimal) -> Result<Self> {
        Ok(Self {
            quantity,
            avg_price,
            cost_basis: decimal_math::mul(quantity, avg_price)?,
        })
    }

    /// Builds a position from a total cost; the average is derived.
    pub fn from_cost(quantity: Decimal, cost_basis: Decimal) -> Result<Self> {
        let avg_price = if quantity > Decimal::ZERO {
            decimal_math::div(cost_basis, quantity)?
        } else {
            Decimal::ZERO
        };
        Ok(Self {
            quantity,
            avg_price,
            cost_basis,
        })
    }
}

/// Domain model for a holding row: the current position in one symbol
/// within one portfolio. A holding exists only while `quantity > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub portfolio_id: String,
    pub symbol: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub avg_price: Decimal,
    pub cost_basis: Decimal,
    /// Incremented on every write; used for conditional updates.
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Holding {
    pub fn position(&self) -> Position {
        Position {
            quantity: self.quantity,
            avg_price: self.avg_price,
            cost_basis: self.cost_basis,
        }
    }

    pub fn with_position(&self, position: Position, now: NaiveDateTime) -> Holding {
        Holding {
            quantity: position.quantity,
            avg_price: position.avg_price,
            cost_basis: position.cost_basis,
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// A holding priced with the latest cached quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    pub price: Option<Decimal>,
    pub price_currency: Option<String>,
    pub market_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub unrealized_pnl_pct: Option<Decimal>,
}

impl ValuedHolding {
    pub fn unpriced(holding: Holding) -> Self {
        Self {
            holding,
            price: None,
            price_currency: None,
            market_value: None,
            unrealized_pnl: None,
            unrealized_pnl_pct: None,
        }
    }

    /// Prices `holding`; fails when the market value or P&L leaves the decimal range.
    pub fn priced(holding: Holding, price: Decimal, currency: String) -> Result<Self> {
        let market_value = decimal_math::mul(holding.quantity, price)?;
        let unrealized = decimal_math::sub(market_value, holding.cost_basis)?;
        let pct = if holding.cost_basis.is_zero() {
            None
        } else {
            let ratio = decimal_math::div(unrealized, holding.cost_basis)?;
            Some(decimal_math::mul(ratio, Decimal::ONE_HUNDRED)?.round_dp(2))
        };
        Ok(Self {
            holding,
            price: Some(price),
            price_currency: Some(currency),
            market_value: Some(market_value),
            unrealized_pnl: Some(unrealized),
            unrealized_pnl_pct: pct,
        })
    }
}
