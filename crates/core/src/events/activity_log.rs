//! Activity log entries recorded from domain events.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::DomainEvent;
use crate::errors::Result;

/// One persisted row of the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: String,
    pub actor_id: String,
    pub portfolio_id: String,
    pub kind: String,
    pub summary: String,
    /// The full event as JSON.
    pub payload: serde_json::Value,
    pub created_at: NaiveDateTime,
}

impl ActivityLogEntry {
    pub fn from_event(event: &DomainEvent, now: NaiveDateTime) -> Result<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            actor_id: event.actor_id().to_string(),
            portfolio_id: event.portfolio_id().to_string(),
            kind: event.kind().to_string(),
            summary: event.describe(),
            payload: serde_json::to_value(event)?,
            created_at: now,
        })
    }
}

/// Storage for the activity log.
#[async_trait]
pub trait ActivityLogRepositoryTrait: Send + Sync {
    async fn append(&self, entry: ActivityLogEntry) -> Result<()>;

    /// Most recent entries for the given portfolios, newest first.
    fn list_for_portfolios(
        &self,
        portfolio_ids: &[String],
        limit: i64,
    ) -> Result<Vec<ActivityLogEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_event() {
        let now = chrono::Utc::now().naive_utc();
        let event = DomainEvent::portfolio_deleted("u1", "p1");
        let entry = ActivityLogEntry::from_event(&event, now).unwrap();
        assert_eq!(entry.kind, "portfolio_deleted");
        assert_eq!(entry.actor_id, "u1");
        assert_eq!(entry.portfolio_id, "p1");
        assert_eq!(entry.payload["type"], "portfolio_deleted");
        assert_eq!(entry.created_at, now);
    }
}
