use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use super::{Repository, RepositoryError};
use crate::entity::Entity;
use crate::entity::EventRecord;
use crate::outbox::{OutboxRecord, OutboxRepository, OutboxStatus};

/// In-memory event-log storage with a transactional outbox.
///
/// `commit` writes the entity's log and appends one outbox record per
/// new event under the same write locks, so an event is never durable
/// without its pending delivery record (and vice versa). Clone-friendly
/// via `Arc` — clones share storage.
#[derive(Clone)]
pub struct HashMapRepository {
    storage: Arc<RwLock<HashMap<String, Vec<EventRecord>>>>,
    outbox: Arc<RwLock<Vec<OutboxRecord>>>,
    outbox_seq: Arc<AtomicU64>,
}

impl Default for HashMapRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl HashMapRepository {
    pub fn new() -> Self {
        HashMapRepository {
            storage: Arc::new(RwLock::new(HashMap::new())),
            outbox: Arc::new(RwLock::new(Vec::new())),
            outbox_seq: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Repository for HashMapRepository {
    fn get(&self, id: &str) -> Result<Option<Entity>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;

        if let Some(events) = storage.get(id) {
            let mut entity = Entity::new();
            entity.set_id(id);
            entity.load_from_history(events.clone());
            Ok(Some(entity))
        } else {
            Ok(None)
        }
    }

    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;
        let mut outbox = self
            .outbox
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("outbox write"))?;

        for record in entity.new_events() {
            let id = self.outbox_seq.fetch_add(1, Ordering::SeqCst);
            outbox.push(OutboxRecord::new(id, entity.id(), record));
        }
        storage.insert(entity.id().to_string(), entity.events().to_vec());
        entity.mark_committed();

        Ok(())
    }
}

impl OutboxRepository for HashMapRepository {
    fn peek_outbox(&self) -> Result<Vec<OutboxRecord>, RepositoryError> {
        let outbox = self
            .outbox
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("outbox read"))?;
        Ok(outbox.clone())
    }

    fn claim_outbox(
        &self,
        worker_id: &str,
        max: usize,
        lease: std::time::Duration,
    ) -> Result<Vec<OutboxRecord>, RepositoryError> {
        let mut outbox = self
            .outbox
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("outbox write"))?;
        let now = SystemTime::now();
        let mut claimed = Vec::new();

        for record in outbox.iter_mut() {
            if claimed.len() >= max {
                break;
            }

            let lease_expired = record
                .locked_until
                .map(|until| until <= now)
                .unwrap_or(true);
            let claimable = record.status == OutboxStatus::Pending
                || (record.status == OutboxStatus::InFlight && lease_expired);
            if !claimable {
                continue;
            }

            record.status = OutboxStatus::InFlight;
            record.attempts += 1;
            record.locked_by = Some(worker_id.to_string());
            record.locked_until = Some(now + lease);
            claimed.push(record.clone());
        }

        Ok(claimed)
    }

    fn complete_outbox(&self, id: u64) -> Result<(), RepositoryError> {
        self.update_outbox(id, |record| {
            record.status = OutboxStatus::Published;
            record.locked_by = None;
            record.locked_until = None;
        })
    }

    fn release_outbox(&self, id: u64, error: &str) -> Result<(), RepositoryError> {
        self.update_outbox(id, |record| {
            record.status = OutboxStatus::Pending;
            record.locked_by = None;
            record.locked_until = None;
            record.last_error = Some(error.to_string());
        })
    }

    fn fail_outbox(&self, id: u64, error: &str) -> Result<(), RepositoryError> {
        self.update_outbox(id, |record| {
            record.status = OutboxStatus::Failed;
            record.locked_by = None;
            record.locked_until = None;
            record.last_error = Some(error.to_string());
        })
    }
}

impl HashMapRepository {
    fn update_outbox<F>(&self, id: u64, update: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut OutboxRecord),
    {
        let mut outbox = self
            .outbox
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("outbox write"))?;
        if let Some(record) = outbox.iter_mut().find(|record| record.id == id) {
            update(record);
        }
        Ok(())
    }
}
