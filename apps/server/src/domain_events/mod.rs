//! Server-side handling of domain events: a channel-backed sink and the
//! worker that writes the activity log and sends notifications.

mod sink;
mod worker;

pub use sink::ServerDomainEventSink;
pub use worker::{event_worker, WorkerDeps};
