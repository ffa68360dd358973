use chrono::NaiveDateTime;
use diesel::prelude::*;

use xportfoy_core::events::ActivityLogEntry;
use xportfoy_core::Result;

use crate::errors::StorageError;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::activity_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityLogDB {
    pub id: String,
    pub actor_id: String,
    pub portfolio_id: String,
    pub kind: String,
    pub summary: String,
    pub payload: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ActivityLogDB> for ActivityLogEntry {
    type Error = xportfoy_core::Error;

    fn try_from(db: ActivityLogDB) -> Result<Self> {
        let payload = serde_json::from_str(&db.payload)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(Self {
            id: db.id,
            actor_id: db.actor_id,
            portfolio_id: db.portfolio_id,
            kind: db.kind,
            summary: db.summary,
            payload,
            created_at: db.created_at,
        })
    }
}

impl From<ActivityLogEntry> for ActivityLogDB {
    fn from(domain: ActivityLogEntry) -> Self {
        Self {
            id: domain.id,
            actor_id: domain.actor_id,
            portfolio_id: domain.portfolio_id,
            kind: domain.kind,
            summary: domain.summary,
            payload: domain.payload.to_string(),
            created_at: domain.created_at,
        }
    }
}
