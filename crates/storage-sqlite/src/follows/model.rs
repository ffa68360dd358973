use chrono::NaiveDateTime;
use diesel::prelude::*;

use xportfoy_core::social::Follow;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::follows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FollowDB {
    pub user_id: String,
    pub portfolio_id: String,
    pub created_at: NaiveDateTime,
}

impl From<Follow> for FollowDB {
    fn from(domain: Follow) -> Self {
        Self {
            user_id: domain.user_id,
            portfolio_id: domain.portfolio_id,
            created_at: domain.created_at,
        }
    }
}
