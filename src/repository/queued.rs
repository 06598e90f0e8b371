use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::lock::Lock;
use super::{Repository, RepositoryError};
use crate::entity::Entity;

/// Repository wrapper enforcing single-writer access per identity.
///
/// `get` acquires the identity's lock before reading; `commit` (or
/// `abort`, for rejected commands) releases it. A concurrent command
/// against the same identity blocks in `get` until the first one
/// finishes, so command cycles against one aggregate never interleave.
/// `peek` reads without locking and is for pure queries only.
pub struct QueuedRepository<R> {
    inner: R,
    locks: Mutex<HashMap<String, Arc<Lock>>>,
}

impl<R> QueuedRepository<R> {
    pub fn new(inner: R) -> Self {
        QueuedRepository {
            inner,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Access the inner repository (for outbox draining and peeks).
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Release an identity's lock without committing. Used when a
    /// command is rejected and the loaded aggregate is discarded.
    pub fn abort(&self, id: impl AsRef<str>) -> Result<(), RepositoryError> {
        let lock = self.ensure_lock(id.as_ref())?;
        lock.unlock();
        Ok(())
    }

    fn ensure_lock(&self, id: &str) -> Result<Arc<Lock>, RepositoryError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("queue map"))?;
        Ok(locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Lock::new()))
            .clone())
    }
}

impl<R: Repository> QueuedRepository<R> {
    /// Non-locking read for pure queries.
    pub fn peek(&self, id: &str) -> Result<Option<Entity>, RepositoryError> {
        self.inner.get(id)
    }
}

impl<R: Repository> Repository for QueuedRepository<R> {
    fn get(&self, id: &str) -> Result<Option<Entity>, RepositoryError> {
        let lock = self.ensure_lock(id)?;
        lock.lock();
        self.inner.get(id)
    }

    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError> {
        let lock = self.ensure_lock(entity.id())?;
        let result = self.inner.commit(entity);
        if result.is_ok() {
            lock.unlock();
        }
        result
    }
}

/// Builder trait for wrapping a repository with queue locking.
pub trait Queueable: Sized {
    fn queued(self) -> QueuedRepository<Self> {
        QueuedRepository::new(self)
    }
}

impl<T> Queueable for T {}
