use std::time::Duration;

use super::{OutboxRepository, OutboxRecord};
use crate::bus::{BusEvent, Publisher};
use crate::repository::RepositoryError;

/// Result of a batch drain operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainResult {
    pub claimed: usize,
    pub completed: usize,
    pub released: usize,
    pub failed: usize,
}

/// Drains pending outbox records to a publisher.
///
/// Claimed records are published one at a time; a publish failure
/// releases the record for retry until `max_attempts`, after which it is
/// marked failed. Retries mean a consumer can see the same event more
/// than once — receivers stay idempotent.
pub struct OutboxWorker<P> {
    publisher: P,
    worker_id: String,
    batch_size: usize,
    lease: Duration,
    max_attempts: u32,
}

impl<P> OutboxWorker<P> {
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            worker_id: format!("worker-{}", std::process::id()),
            batch_size: 10,
            lease: Duration::from_secs(60),
            max_attempts: 3,
        }
    }

    /// Set the worker ID (used for lease tracking).
    pub fn with_worker_id(mut self, id: impl Into<String>) -> Self {
        self.worker_id = id.into();
        self
    }

    /// Set the batch size (max records to claim per drain).
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the maximum number of attempts before failing a record.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<P: Publisher> OutboxWorker<P> {
    /// Claim and publish one batch of pending records.
    pub fn drain<R: OutboxRepository>(&self, repo: &R) -> Result<DrainResult, RepositoryError> {
        let claimed = repo.claim_outbox(&self.worker_id, self.batch_size, self.lease)?;
        let mut result = DrainResult {
            claimed: claimed.len(),
            ..DrainResult::default()
        };

        for record in claimed {
            match self.publish_record(&record) {
                Ok(()) => {
                    repo.complete_outbox(record.id)?;
                    result.completed += 1;
                }
                Err(err) => {
                    let message = err.to_string();
                    if record.attempts >= self.max_attempts {
                        tracing::error!(
                            outbox_id = record.id,
                            event_type = %record.event_type,
                            error = %message,
                            "outbox record failed permanently"
                        );
                        repo.fail_outbox(record.id, &message)?;
                        result.failed += 1;
                    } else {
                        repo.release_outbox(record.id, &message)?;
                        result.released += 1;
                    }
                }
            }
        }

        Ok(result)
    }

    fn publish_record(&self, record: &OutboxRecord) -> Result<(), crate::bus::PublishError> {
        self.publisher.publish(BusEvent::new(
            record.delivery_id(),
            record.event_type.clone(),
            record.payload.clone(),
        ))
    }
}
