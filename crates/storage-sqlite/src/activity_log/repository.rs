use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use xportfoy_core::events::{ActivityLogEntry, ActivityLogRepositoryTrait};
use xportfoy_core::Result;

use super::model::ActivityLogDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::activity_log;
use crate::utils::chunk_for_sqlite;

pub struct ActivityLogRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ActivityLogRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ActivityLogRepositoryTrait for ActivityLogRepository {
    async fn append(&self, entry: ActivityLogEntry) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(activity_log::table)
                    .values(ActivityLogDB::from(entry))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn list_for_portfolios(
        &self,
        portfolio_ids: &[String],
        limit: i64,
    ) -> Result<Vec<ActivityLogEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(portfolio_ids) {
            rows.extend(
                activity_log::table
                    .filter(activity_log::portfolio_id.eq_any(chunk))
                    .order((activity_log::created_at.desc(), activity_log::id.desc()))
                    .limit(limit)
                    .select(ActivityLogDB::as_select())
                    .load::<ActivityLogDB>(&mut conn)
                    .map_err(StorageError::from)?,
            );
        }
        // Chunks are each ordered; merge them into one window.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        rows.truncate(limit.max(0) as usize);
        rows.into_iter().map(ActivityLogEntry::try_from).collect()
    }
}
