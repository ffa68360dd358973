use std::sync::Arc;

use tokio::sync::mpsc;
use xportfoy_core::events::{DomainEvent, DomainEventSink};

use super::worker::{event_worker, WorkerDeps};

/// Domain event sink for the server runtime.
///
/// Events are queued on an unbounded channel and handled by a background
/// worker, so `emit` never waits on the database or the network.
pub struct ServerDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl ServerDomainEventSink {
    /// Creates the sink and spawns its worker on the current runtime.
    pub fn spawn(deps: WorkerDeps) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(event_worker(rx, Arc::new(deps)));
        Self { tx }
    }
}

impl DomainEventSink for ServerDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Dropping domain event {}: worker stopped", e.0.kind());
        }
    }
}
