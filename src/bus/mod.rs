//! Event delivery between aggregates and their consumers.
//!
//! Committed events reach the bus through the outbox worker, and the
//! relay and the view pull them off with their own subscriber cursors.
//! Delivery is at-least-once: the worker retries failed publishes, and a
//! subscriber cursor can be reset to replay the stream from the start.

mod in_memory_queue;
mod publisher;
mod subscriber;

pub use in_memory_queue::InMemoryQueue;
pub use publisher::{BusEvent, PublishError, Publisher};
pub use subscriber::Subscriber;
