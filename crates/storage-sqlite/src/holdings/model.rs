//! Database model for holdings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use xportfoy_core::holdings::Holding;
use xportfoy_core::Result;

use crate::utils::{decimal_to_text, parse_decimal};

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub portfolio_id: String,
    pub symbol: String,
    pub asset_type: String,
    pub quantity: String,
    pub avg_price: String,
    pub cost_basis: String,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<HoldingDB> for Holding {
    type Error = xportfoy_core::Error;

    fn try_from(db: HoldingDB) -> Result<Self> {
        Ok(Self {
            asset_type: db.asset_type.parse()?,
            quantity: parse_decimal(&db.quantity, "quantity")?,
            avg_price: parse_decimal(&db.avg_price, "avg_price")?,
            cost_basis: parse_decimal(&db.cost_basis, "cost_basis")?,
            portfolio_id: db.portfolio_id,
            symbol: db.symbol,
            version: db.version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&Holding> for HoldingDB {
    fn from(domain: &Holding) -> Self {
        Self {
            portfolio_id: domain.portfolio_id.clone(),
            symbol: domain.symbol.clone(),
            asset_type: domain.asset_type.as_str().to_string(),
            quantity: decimal_to_text(domain.quantity),
            avg_price: decimal_to_text(domain.avg_price),
            cost_basis: decimal_to_text(domain.cost_basis),
            version: domain.version,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
