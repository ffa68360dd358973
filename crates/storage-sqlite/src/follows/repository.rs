use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel::SqliteConnection;

use xportfoy_core::social::{Follow, FollowRepositoryTrait};
use xportfoy_core::Result;

use super::model::FollowDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::follows;
use crate::utils::chunk_for_sqlite;

pub struct FollowRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FollowRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FollowRepositoryTrait for FollowRepository {
    async fn follow(&self, follow: Follow) -> Result<bool> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let inserted = diesel::insert_or_ignore_into(follows::table)
                    .values(FollowDB::from(follow))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted > 0)
            })
            .await
    }

    async fn unfollow(&self, user_id: &str, portfolio_id: &str) -> Result<bool> {
        let key = (user_id.to_string(), portfolio_id.to_string());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let deleted = diesel::delete(follows::table.find((&key.0, &key.1)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted > 0)
            })
            .await
    }

    fn list_followed_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(follows::table
            .filter(follows::user_id.eq(user_id))
            .order(follows::created_at.desc())
            .select(follows::portfolio_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn count_by_portfolios(&self, portfolio_ids: &[String]) -> Result<HashMap<String, i64>> {
        let mut conn = get_connection(&self.pool)?;
        let mut counts = HashMap::new();
        for chunk in chunk_for_sqlite(portfolio_ids) {
            let rows = follows::table
                .filter(follows::portfolio_id.eq_any(chunk))
                .group_by(follows::portfolio_id)
                .select((follows::portfolio_id, count(follows::user_id)))
                .load::<(String, i64)>(&mut conn)
                .map_err(StorageError::from)?;
            counts.extend(rows);
        }
        Ok(counts)
    }
}
