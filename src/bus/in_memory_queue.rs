use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use super::publisher::{BusEvent, PublishError};
use super::subscriber::Subscriber;
use super::Publisher;

/// In-memory queue for single-process pipelines and tests.
///
/// Events live in a shared append-only log; each subscriber tracks its
/// own read position. `new_subscriber` creates an independent consumer
/// over the same log, and `reset_position` rewinds a consumer to the
/// start — which is exactly a full redelivery of the stream.
#[derive(Clone)]
pub struct InMemoryQueue {
    /// Shared event log
    log: Arc<RwLock<Vec<BusEvent>>>,
    /// Per-subscriber read position
    position: Arc<Mutex<usize>>,
    /// Acknowledged event IDs
    acked: Arc<Mutex<Vec<String>>>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a new subscriber that shares the same log but has its own
    /// position.
    pub fn new_subscriber(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All events currently in the log.
    pub fn events(&self) -> Vec<BusEvent> {
        self.log.read().unwrap().clone()
    }

    /// All event types in publish order.
    pub fn event_types(&self) -> Vec<String> {
        self.log
            .read()
            .unwrap()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().unwrap().is_empty()
    }

    /// Rewind this subscriber to the beginning of the log.
    pub fn reset_position(&self) {
        *self.position.lock().unwrap() = 0;
    }

    /// Acknowledged event IDs, in ack order.
    pub fn acknowledged(&self) -> Vec<String> {
        self.acked.lock().unwrap().clone()
    }
}

impl Publisher for InMemoryQueue {
    fn publish(&self, event: BusEvent) -> Result<(), PublishError> {
        self.log.write().unwrap().push(event);
        Ok(())
    }

    fn publish_batch(&self, events: Vec<BusEvent>) -> Result<(), PublishError> {
        self.log.write().unwrap().extend(events);
        Ok(())
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<BusEvent>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self.log.read().unwrap();
                let mut pos = self.position.lock().unwrap();

                if *pos < log.len() {
                    let event = log[*pos].clone();
                    *pos += 1;
                    return Ok(Some(event));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, event_id: &str) -> Result<(), PublishError> {
        self.acked.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}
