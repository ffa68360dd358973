use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::AssetType;
use crate::transactions::normalize_symbol;

/// Latest known price of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub asset_type: AssetType,
    pub price: Decimal,
    pub currency: String,
    pub fetched_at: DateTime<Utc>,
}

/// A symbol to price, identified the same way holdings are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteRequest {
    pub symbol: String,
    pub asset_type: AssetType,
}

impl QuoteRequest {
    pub fn new(symbol: &str, asset_type: AssetType) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            asset_type,
        }
    }
}
