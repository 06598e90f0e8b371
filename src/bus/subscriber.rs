use super::publisher::{BusEvent, PublishError};

/// Trait for subscribing to events from a message bus.
///
/// This is a pull-based interface: each consumer polls for the next
/// event and acknowledges it once processed.
pub trait Subscriber: Send + Sync {
    /// Poll for the next event, blocking until one is available or the
    /// timeout expires.
    fn poll(&self, timeout_ms: u64) -> Result<Option<BusEvent>, PublishError>;

    /// Acknowledge that an event has been processed.
    fn ack(&self, event_id: &str) -> Result<(), PublishError>;
}
