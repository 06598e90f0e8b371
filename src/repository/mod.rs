//! Storage for entity event logs.
//!
//! [`HashMapRepository`] persists logs in memory and appends outbox
//! records in the same transaction as the log write. Wrapping it in a
//! [`QueuedRepository`] serializes all command processing per identity:
//! a load-and-commit cycle holds that identity's lock, so concurrent
//! commands against the same aggregate queue instead of interleaving.

mod aggregate;
mod error;
mod hashmap;
mod lock;
mod queued;

pub use aggregate::{hydrate, Aggregate};
pub use error::RepositoryError;
pub use hashmap::HashMapRepository;
pub use queued::{Queueable, QueuedRepository};

use crate::entity::Entity;

/// Get and commit entities by ID.
pub trait Repository {
    /// Load an entity's persisted log, or `None` if the identity has no
    /// history yet.
    fn get(&self, id: &str) -> Result<Option<Entity>, RepositoryError>;

    /// Durably append the entity's new events. All events of one commit
    /// become visible together; readers never observe a partial batch.
    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError>;
}
