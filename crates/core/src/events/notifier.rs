//! Outbound notifications for domain events.

use async_trait::async_trait;

use super::DomainEvent;
use crate::errors::Result;

/// Delivers a short message about a domain event to an external channel.
///
/// Callers treat delivery failures as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &DomainEvent) -> Result<()>;
}

/// Notifier used when no channel is configured.
#[derive(Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _event: &DomainEvent) -> Result<()> {
        Ok(())
    }
}
