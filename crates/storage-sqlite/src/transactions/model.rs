//! Database model for transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use xportfoy_core::transactions::Transaction;
use xportfoy_core::Result;

use crate::utils::{decimal_to_text, parse_decimal};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub symbol: String,
    pub asset_type: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub fee: String,
    pub trade_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = xportfoy_core::Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Self {
            asset_type: db.asset_type.parse()?,
            side: db.side.parse()?,
            quantity: parse_decimal(&db.quantity, "quantity")?,
            price: parse_decimal(&db.price, "price")?,
            fee: parse_decimal(&db.fee, "fee")?,
            id: db.id,
            portfolio_id: db.portfolio_id,
            symbol: db.symbol,
            trade_date: db.trade_date,
            note: db.note,
            created_at: db.created_at,
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        Self {
            id: domain.id.clone(),
            portfolio_id: domain.portfolio_id.clone(),
            symbol: domain.symbol.clone(),
            asset_type: domain.asset_type.as_str().to_string(),
            side: domain.side.as_str().to_string(),
            quantity: decimal_to_text(domain.quantity),
            price: decimal_to_text(domain.price),
            fee: decimal_to_text(domain.fee),
            trade_date: domain.trade_date,
            note: domain.note.clone(),
            created_at: domain.created_at,
        }
    }
}
