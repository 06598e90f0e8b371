use std::fmt;

use super::RepositoryError;
use crate::entity::{Entity, EventRecord};

/// A domain aggregate backed by an event-sourced [`Entity`].
///
/// `replay_event` is the read-path half of the aggregate's fold: given a
/// persisted record it must apply the decoded event to in-memory state.
/// Implementations route it through the same `apply` function the write
/// path uses, so live updates and cold-start replay can never diverge.
pub trait Aggregate: Sized + Default {
    type ReplayError: fmt::Display;

    fn new_empty() -> Self {
        Self::default()
    }
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;
    fn replay_event(&mut self, event: &EventRecord) -> Result<(), Self::ReplayError>;
}

/// Hydrate an aggregate from an entity by replaying its events.
pub fn hydrate<A: Aggregate>(entity: Entity) -> Result<A, RepositoryError> {
    let mut aggregate = A::new_empty();
    *aggregate.entity_mut() = entity;

    let events = aggregate.entity().events().to_vec();
    aggregate.entity_mut().set_replaying(true);
    for event in &events {
        if let Err(err) = aggregate.replay_event(event) {
            aggregate.entity_mut().set_replaying(false);
            return Err(RepositoryError::Replay(err.to_string()));
        }
    }
    aggregate.entity_mut().set_replaying(false);

    Ok(aggregate)
}
