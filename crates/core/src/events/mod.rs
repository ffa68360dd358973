//! Domain events module.
//!
//! Provides domain event types, the sink trait for emitting events after
//! successful mutations, and the two consumers of those events: the
//! persisted activity log and outbound notifications.

mod activity_log;
mod domain_event;
mod notifier;
mod sink;

pub use activity_log::*;
pub use domain_event::*;
pub use notifier::*;
pub use sink::*;
