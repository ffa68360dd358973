use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use xportfoy_core::events::{ActivityLogEntry, ActivityLogRepositoryTrait, DomainEvent, Notifier};

pub struct WorkerDeps {
    pub activity_log: Arc<dyn ActivityLogRepositoryTrait>,
    pub notifier: Arc<dyn Notifier>,
}

/// Processes events one by one until the channel closes. Failures are
/// logged and never reach the request that produced the event.
pub async fn event_worker(mut rx: mpsc::UnboundedReceiver<DomainEvent>, deps: Arc<WorkerDeps>) {
    tracing::info!("Domain event worker started");
    while let Some(event) = rx.recv().await {
        handle_event(&event, &deps).await;
    }
    tracing::info!("Domain event worker shutting down");
}

async fn handle_event(event: &DomainEvent, deps: &WorkerDeps) {
    match ActivityLogEntry::from_event(event, Utc::now().naive_utc()) {
        Ok(entry) => {
            if let Err(e) = deps.activity_log.append(entry).await {
                tracing::warn!("Failed to write activity log for {}: {}", event.kind(), e);
            }
        }
        Err(e) => tracing::warn!("Failed to build activity log for {}: {}", event.kind(), e),
    }

    if let Err(e) = deps.notifier.notify(event).await {
        tracing::warn!("Failed to send notification for {}: {}", event.kind(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use xportfoy_core::errors::{Error, Result};

    #[derive(Default)]
    struct RecordingLog {
        entries: Mutex<Vec<ActivityLogEntry>>,
        fail: bool,
    }

    #[async_trait]
    impl ActivityLogRepositoryTrait for RecordingLog {
        async fn append(&self, entry: ActivityLogEntry) -> Result<()> {
            if self.fail {
                return Err(Error::Unexpected("disk full".into()));
            }
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn list_for_portfolios(
            &self,
            _portfolio_ids: &[String],
            _limit: i64,
        ) -> Result<Vec<ActivityLogEntry>> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: Mutex<usize>,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _event: &DomainEvent) -> Result<()> {
            *self.sent.lock().unwrap() += 1;
            Err(Error::Unexpected("telegram down".into()))
        }
    }

    #[tokio::test]
    async fn test_worker_writes_log_and_survives_failures() {
        let log = Arc::new(RecordingLog::default());
        let notifier = Arc::new(CountingNotifier::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let deps = Arc::new(WorkerDeps {
            activity_log: log.clone(),
            notifier: notifier.clone(),
        });

        tx.send(DomainEvent::portfolio_deleted("alice", "p1")).unwrap();
        tx.send(DomainEvent::portfolio_deleted("alice", "p2")).unwrap();
        drop(tx);
        event_worker(rx, deps).await;

        assert_eq!(log.entries.lock().unwrap().len(), 2);
        assert_eq!(*notifier.sent.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_worker_continues_when_log_write_fails() {
        let log = Arc::new(RecordingLog {
            fail: true,
            ..Default::default()
        });
        let notifier = Arc::new(CountingNotifier::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let deps = Arc::new(WorkerDeps {
            activity_log: log.clone(),
            notifier: notifier.clone(),
        });

        tx.send(DomainEvent::portfolio_deleted("alice", "p1")).unwrap();
        drop(tx);
        event_worker(rx, deps).await;

        assert!(log.entries.lock().unwrap().is_empty());
        assert_eq!(*notifier.sent.lock().unwrap(), 1);
    }
}
