//! Database model for portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use xportfoy_core::portfolios::Portfolio;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            description: db.description,
            is_public: db.is_public,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Portfolio> for PortfolioDB {
    fn from(domain: Portfolio) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            name: domain.name,
            description: domain.description,
            is_public: domain.is_public,
            currency: domain.currency,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
